use std::fmt;

use glam::Vec3;
use placekit_core::{DragTransfer, ItemId, HOTBAR_SIZE};
use placekit_hotbar::{AssignOutcome, HotbarEvent, SlotView};
use placekit_input::parse_key_code;
use placekit_scene::{PlacedEntityId, SceneTransform};
use placekit_session::{CatalogSession, SelectionMode, SessionSignal};
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

/// Where a drag ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropTarget {
    /// Quick-access slot (0-based).
    Slot(usize),
    /// The live scene, optionally at a position.
    Scene(Option<Vec3>),
    /// Released outside every target.
    Nowhere,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Help,
    Load,
    List,
    Slots,
    Open,
    Assign { item: ItemId, slot: usize },
    Clear { slot: usize },
    Key { key: KeyCode, typing: bool },
    SelectItem { item: ItemId },
    SelectSlot { slot: usize },
    Drag { item: ItemId },
    Hover { slot: usize },
    Drop { target: DropTarget },
    Mode { mode: Option<SelectionMode> },
    Tab { category: String },
    Search { query: String },
    Remove { entity: PlacedEntityId },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub lines: Vec<String>,
}

impl CommandOutput {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Line-oriented front end over a [`CatalogSession`].
pub struct Console {
    session: CatalogSession,
    transfer: Option<DragTransfer>,
}

impl Console {
    pub fn new(session: CatalogSession) -> Self {
        Self {
            session,
            transfer: None,
        }
    }

    pub fn session(&self) -> &CatalogSession {
        &self.session
    }

    pub async fn execute(&mut self, cmd: ConsoleCommand) -> CommandOutput {
        let mut out = CommandOutput::default();
        self.apply(cmd, &mut out).await;

        for event in self.session.drain_hotbar_events() {
            match event {
                HotbarEvent::Assigned { slot, item_id } => {
                    out.push(format!("Slot {} <- {item_id}", slot + 1))
                }
                HotbarEvent::Cleared { slot } => out.push(format!("Slot {} cleared", slot + 1)),
                HotbarEvent::Resolved => {}
            }
        }

        if self.session.take_reload_request() {
            self.session.reload().await;
            out.push(format!(
                "Scene changed; catalog reloaded ({} items)",
                self.session.snapshot().len()
            ));
        }
        out
    }

    async fn apply(&mut self, cmd: ConsoleCommand, out: &mut CommandOutput) {
        let session = &mut self.session;
        match cmd {
            ConsoleCommand::Help => out.lines.extend(help_lines()),
            ConsoleCommand::Load => {
                session.reload().await;
                let snapshot = session.snapshot();
                match &snapshot.error {
                    Some(error) => out.push(format!("Error: {error}")),
                    None => out.push(format!(
                        "Loaded {} items in {} categories",
                        snapshot.len(),
                        snapshot.categories.len()
                    )),
                }
            }
            ConsoleCommand::List => {
                let visible = session.visible_items();
                if visible.is_empty() {
                    out.push("No items");
                }
                for item in visible {
                    out.push(format!(
                        "{} [{}] {} ({})",
                        item.id, item.kind, item.file_name, item.category
                    ));
                }
            }
            ConsoleCommand::Slots => {
                for (index, view) in session.hotbar().slots().enumerate() {
                    let label = match view {
                        SlotView::Empty => "-".to_string(),
                        SlotView::Pending(id) => format!("{id} (pending)"),
                        SlotView::Occupied(item) => format!("{} {}", item.id, item.file_name),
                    };
                    out.push(format!("{}: {label}", index + 1));
                }
            }
            ConsoleCommand::Open => {
                session.set_open(true);
                out.push("Catalog open");
            }
            ConsoleCommand::Assign { item, slot } => match session.assign_to_slot(&item, slot) {
                Ok(AssignOutcome::Unchanged) => out.push(format!("{item} already in slot {}", slot + 1)),
                Ok(_) => {}
                Err(err) => out.push(format!("Error: {err}")),
            },
            ConsoleCommand::Clear { slot } => {
                if let Err(err) = session.clear_slot(slot) {
                    out.push(format!("Error: {err}"));
                }
            }
            ConsoleCommand::Key { key, typing } => {
                let placed_before = session.placed().len();
                match session.handle_key(key, typing) {
                    SessionSignal::Ignored => out.push(format!("{key:?} ignored")),
                    SessionSignal::CloseCatalog => out.push("Catalog closed"),
                    SessionSignal::Handled => describe_selection(session, out),
                }
                report_new_placements(session, placed_before, out);
            }
            ConsoleCommand::SelectItem { item } => match session.click_item(&item) {
                Ok(_) => describe_selection(session, out),
                Err(err) => out.push(format!("Error: {err}")),
            },
            ConsoleCommand::SelectSlot { slot } => {
                let placed_before = session.placed().len();
                match session.click_slot(slot) {
                    Ok(_) => describe_selection(session, out),
                    Err(err) => out.push(format!("Error: {err}")),
                }
                report_new_placements(session, placed_before, out);
            }
            ConsoleCommand::Drag { item } => match session.drag_start(&item) {
                Ok(transfer) => {
                    out.push(format!("Dragging {}", transfer.text));
                    self.transfer = Some(transfer);
                }
                Err(err) => out.push(format!("Error: {err}")),
            },
            ConsoleCommand::Hover { slot } => session.drag_over(slot),
            ConsoleCommand::Drop { target } => {
                match target {
                    DropTarget::Slot(slot) => {
                        if session.drop_on_slot(slot).is_none() {
                            out.push("Nothing to drop");
                        }
                    }
                    DropTarget::Scene(position) => match &self.transfer {
                        Some(transfer) => {
                            let transform = position.map(SceneTransform::at);
                            match session.drop_on_scene(&transfer.json, transform) {
                                Ok(entity) => out.push(format!("Placed {entity}")),
                                Err(err) => out.push(format!("Error: {err}")),
                            }
                        }
                        None => out.push("Nothing to drop"),
                    },
                    DropTarget::Nowhere => {}
                }
                session.drag_end();
                self.transfer = None;
            }
            ConsoleCommand::Mode { mode } => {
                match mode {
                    Some(mode) => session.set_mode(mode),
                    None => {
                        session.apply_action(placekit_input::CatalogAction::ToggleMode);
                    }
                }
                out.push(format!("Mode: {}", session.selection().mode.as_str()));
            }
            ConsoleCommand::Tab { category } => match session.set_category(&category) {
                Ok(()) => out.push(format!(
                    "Tab {category}: {} items",
                    session.visible_items().len()
                )),
                Err(err) => out.push(format!("Error: {err}")),
            },
            ConsoleCommand::Search { query } => {
                session.set_search(&query);
                out.push(format!("{} items match", session.visible_items().len()));
            }
            ConsoleCommand::Remove { entity } => match session.remove_placed(entity) {
                Ok(()) => out.push(format!("Removed {entity}")),
                Err(err) => out.push(format!("Error: {err}")),
            },
        }
    }
}

fn describe_selection(session: &CatalogSession, out: &mut CommandOutput) {
    let selection = session.selection();
    let item = selection
        .selected_item
        .as_ref()
        .map_or_else(|| "-".to_string(), |item| item.id.to_string());
    let slot = selection
        .selected_slot
        .map_or_else(|| "-".to_string(), |slot| (slot + 1).to_string());
    out.push(format!(
        "Selected item {item}, slot {slot}, mode {}",
        selection.mode.as_str()
    ));
}

fn report_new_placements(session: &CatalogSession, before: usize, out: &mut CommandOutput) {
    for (entity, record) in session.placed().iter().skip(before) {
        out.push(format!("Placed {entity} ({})", record.item_id));
    }
}

pub fn parse_command(input: &str) -> Result<ConsoleCommand, CommandError> {
    let input = input.trim();
    let input = input.strip_prefix('/').unwrap_or(input).trim();
    if input.is_empty() {
        return Ok(ConsoleCommand::Help);
    }

    let mut parts = input.split_whitespace();
    let cmd = parts
        .next()
        .ok_or_else(|| CommandError::new("Missing command"))?
        .to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    match cmd.as_str() {
        "help" | "?" => Ok(ConsoleCommand::Help),
        "load" | "reload" => Ok(ConsoleCommand::Load),
        "list" | "ls" => Ok(ConsoleCommand::List),
        "slots" => Ok(ConsoleCommand::Slots),
        "open" => Ok(ConsoleCommand::Open),
        "assign" => {
            if args.len() != 2 {
                return Err(CommandError::new("Usage: assign <item-id> <slot 1-9>"));
            }
            Ok(ConsoleCommand::Assign {
                item: ItemId::new(args[0]),
                slot: parse_slot(args[1])?,
            })
        }
        "clear" => {
            if args.len() != 1 {
                return Err(CommandError::new("Usage: clear <slot 1-9>"));
            }
            Ok(ConsoleCommand::Clear {
                slot: parse_slot(args[0])?,
            })
        }
        "key" => {
            let (token, typing) = match args.as_slice() {
                [token] => (*token, false),
                [token, "--typing"] => (*token, true),
                _ => return Err(CommandError::new("Usage: key <key> [--typing]")),
            };
            let key = parse_key_code(token)
                .ok_or_else(|| CommandError::new(format!("Unknown key: {token}")))?;
            Ok(ConsoleCommand::Key { key, typing })
        }
        "select" => match args.as_slice() {
            ["item", id] => Ok(ConsoleCommand::SelectItem {
                item: ItemId::new(*id),
            }),
            ["slot", slot] => Ok(ConsoleCommand::SelectSlot {
                slot: parse_slot(slot)?,
            }),
            _ => Err(CommandError::new("Usage: select <item <id>|slot <1-9>>")),
        },
        "drag" => {
            if args.len() != 1 {
                return Err(CommandError::new("Usage: drag <item-id>"));
            }
            Ok(ConsoleCommand::Drag {
                item: ItemId::new(args[0]),
            })
        }
        "hover" => {
            if args.len() != 1 {
                return Err(CommandError::new("Usage: hover <slot 1-9>"));
            }
            Ok(ConsoleCommand::Hover {
                slot: parse_slot(args[0])?,
            })
        }
        "drop" => parse_drop(&args),
        "mode" => match args.as_slice() {
            [] => Ok(ConsoleCommand::Mode { mode: None }),
            [name] => SelectionMode::parse(name)
                .map(|mode| ConsoleCommand::Mode { mode: Some(mode) })
                .ok_or_else(|| CommandError::new("Usage: mode [browse|assign]")),
            _ => Err(CommandError::new("Usage: mode [browse|assign]")),
        },
        "tab" => {
            if args.len() != 1 {
                return Err(CommandError::new("Usage: tab <category>"));
            }
            Ok(ConsoleCommand::Tab {
                category: args[0].to_ascii_lowercase(),
            })
        }
        "search" => Ok(ConsoleCommand::Search {
            query: args.join(" "),
        }),
        "remove" => {
            let raw = match args.as_slice() {
                [raw] => raw.trim_start_matches('#'),
                _ => return Err(CommandError::new("Usage: remove <entity>")),
            };
            let id = raw
                .parse::<u64>()
                .map_err(|_| CommandError::new(format!("Invalid entity: {raw}")))?;
            Ok(ConsoleCommand::Remove {
                entity: PlacedEntityId(id),
            })
        }
        _ => Err(CommandError::new(format!("Unknown command: {cmd}. Try help"))),
    }
}

fn parse_drop(args: &[&str]) -> Result<ConsoleCommand, CommandError> {
    let usage = || CommandError::new("Usage: drop <slot <1-9>|scene [x y z]|none>");
    let target = match args {
        ["slot", slot] => DropTarget::Slot(parse_slot(slot)?),
        ["scene"] => DropTarget::Scene(None),
        ["scene", x, y, z] => DropTarget::Scene(Some(Vec3::new(
            parse_coord(x)?,
            parse_coord(y)?,
            parse_coord(z)?,
        ))),
        ["none"] => DropTarget::Nowhere,
        _ => return Err(usage()),
    };
    Ok(ConsoleCommand::Drop { target })
}

/// Console slots are 1-based like the digit keys.
fn parse_slot(s: &str) -> Result<usize, CommandError> {
    match s.trim().parse::<usize>() {
        Ok(n) if (1..=HOTBAR_SIZE).contains(&n) => Ok(n - 1),
        _ => Err(CommandError::new(format!(
            "Invalid slot: {s} (expected 1-{HOTBAR_SIZE})"
        ))),
    }
}

fn parse_coord(s: &str) -> Result<f32, CommandError> {
    s.trim()
        .parse::<f32>()
        .map_err(|_| CommandError::new(format!("Invalid coordinate: {s}")))
}

pub fn help_lines() -> Vec<String> {
    [
        "Commands:",
        "  load                      reload the catalog",
        "  list                      items under the current tab and search",
        "  tab <category>            switch category tab",
        "  search [text]             filter by file name",
        "  slots                     show the quick-access bar",
        "  assign <item> <slot>      put an item in a slot",
        "  clear <slot>              empty a slot",
        "  select item <id>          click a catalog item",
        "  select slot <n>           activate a slot",
        "  key <key> [--typing]      press a key (1-9, e, esc, b, x)",
        "  mode [browse|assign]      set or toggle selection mode",
        "  drag <item>               start dragging an item",
        "  hover <slot>              drag over a slot",
        "  drop <slot <n>|scene [x y z]|none>",
        "  remove <entity>           remove a placed entity",
        "  open                      reopen the catalog view",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}
