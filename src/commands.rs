//! Chat command surface for the plugin.
//!
//! `/dance add [gesture] [gearSet]`, `/dance setdance <gesture>`, and friends.
//! Each subcommand maps onto one or more registry/scheduler/lookup operations;
//! all the lifecycle logic lives behind [`DancingNpcs`], this module only
//! parses, checks the permission gate and formats messages.

use crate::error::DanceError;
use crate::gear::GearProvider;
use crate::host::{Host, PlayerId};
use crate::plugin::{DancingNpcs, GearOutcome};

/// Permission required for every mutating subcommand.
pub const PERM_USE: &str = "dancingnpcs.use";

/// Result of executing a command
pub struct CommandResult {
    /// Whether the command was successful
    pub success: bool,
    /// Message to display to the user
    pub message: String,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Parse and execute a chat command.
/// Returns None if it's not this plugin's command (doesn't start with
/// `/<command>`).
pub fn parse_and_execute<H: Host, G: GearProvider>(
    content: &str,
    player: PlayerId,
    plugin: &mut DancingNpcs<H, G>,
) -> Option<CommandResult> {
    if !content.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = content[1..].split_whitespace().collect();
    if parts
        .first()
        .map_or(true, |c| !c.eq_ignore_ascii_case(&plugin.config().command))
    {
        return None;
    }

    let sub = parts.get(1).map(|s| s.to_lowercase()).unwrap_or_default();
    let args: &[&str] = if parts.len() > 2 { &parts[2..] } else { &[] };

    // Listing and help are open to everyone; anything that touches NPCs
    // needs the use permission.
    Some(match sub.as_str() {
        "" | "help" => cmd_help(plugin),
        "dances" => cmd_dances(plugin),
        "gear" => cmd_gear_list(plugin),
        "add" | "setdance" | "setgear" | "remove" | "clear"
            if !plugin.host().has_permission(player, PERM_USE) =>
        {
            CommandResult::error("You don't have permission to use dancing NPCs")
        }
        "add" => cmd_add(player, args, plugin),
        "setdance" => cmd_setdance(player, args, plugin),
        "setgear" => cmd_setgear(player, args, plugin),
        "remove" => cmd_remove(player, plugin),
        "clear" => cmd_clear(player, plugin),
        other => CommandResult::error(format!(
            "Unknown subcommand: {}. Try /{} help",
            other,
            plugin.config().command
        )),
    })
}

fn cmd_help<H: Host, G: GearProvider>(plugin: &DancingNpcs<H, G>) -> CommandResult {
    let cmd = &plugin.config().command;
    let mut help = String::from("Dancing NPCs:\n");
    help.push_str(&format!(
        "  /{} add [gesture] [gearSet] - Spawn a dancing NPC in front of you\n",
        cmd
    ));
    help.push_str(&format!(
        "  /{} setdance <gesture> - Change the dance of the NPC you look at\n",
        cmd
    ));
    help.push_str(&format!(
        "  /{} setgear <gearSet> - Change the gear of the NPC you look at\n",
        cmd
    ));
    help.push_str(&format!(
        "  /{} remove - Remove the NPC you look at\n",
        cmd
    ));
    help.push_str(&format!("  /{} clear - Remove all your NPCs\n", cmd));
    help.push_str(&format!("  /{} dances - List available dances\n", cmd));
    help.push_str(&format!("  /{} gear - List available gear sets\n", cmd));
    CommandResult::success(help)
}

fn cmd_dances<H: Host, G: GearProvider>(plugin: &DancingNpcs<H, G>) -> CommandResult {
    let gestures = &plugin.config().gestures;
    if gestures.is_empty() {
        return CommandResult::success("No dances configured");
    }
    let mut msg = String::from("Dances:\n");
    for (i, name) in gestures.iter().enumerate() {
        msg.push_str(&format!("  [{}] {}\n", i + 1, name));
    }
    CommandResult::success(msg)
}

fn cmd_gear_list<H: Host, G: GearProvider>(plugin: &DancingNpcs<H, G>) -> CommandResult {
    let sets = &plugin.config().gear_sets;
    if sets.is_empty() {
        return CommandResult::success("No gear sets configured");
    }
    let mut msg = String::from("Gear sets:\n");
    for name in sets {
        msg.push_str(&format!("  {}\n", name));
    }
    CommandResult::success(msg)
}

fn cmd_add<H: Host, G: GearProvider>(
    player: PlayerId,
    args: &[&str],
    plugin: &mut DancingNpcs<H, G>,
) -> CommandResult {
    let gesture = args.first().copied();
    let gear_set = args.get(1).copied();

    match plugin.add_npc(player, gesture, gear_set) {
        Ok(spawned) => {
            let dance = match &spawned.gesture {
                Some(name) => format!("dancing `{}`", name),
                None => "idle (no dances configured)".to_string(),
            };
            let gear = match &spawned.gear {
                GearOutcome::None => String::new(),
                GearOutcome::Applied(name) => format!(", wearing `{}`", name),
                GearOutcome::NotApplied(name) => {
                    format!(", but gear `{}` was not applied", name)
                }
            };
            CommandResult::success(format!("NPC spawned, {}{}", dance, gear))
        }
        Err(e) => error_message(plugin, e),
    }
}

fn cmd_setdance<H: Host, G: GearProvider>(
    player: PlayerId,
    args: &[&str],
    plugin: &mut DancingNpcs<H, G>,
) -> CommandResult {
    let Some(input) = args.first() else {
        return CommandResult::error(format!(
            "Usage: /{} setdance <gesture>",
            plugin.config().command
        ));
    };
    match plugin.set_dance(player, input) {
        Ok(gesture) => CommandResult::success(format!("NPC now dances `{}`", gesture)),
        Err(e) => error_message(plugin, e),
    }
}

fn cmd_setgear<H: Host, G: GearProvider>(
    player: PlayerId,
    args: &[&str],
    plugin: &mut DancingNpcs<H, G>,
) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::error(format!(
            "Usage: /{} setgear <gearSet>",
            plugin.config().command
        ));
    };
    match plugin.set_gear(player, name) {
        Ok(()) => CommandResult::success(format!("NPC now wears `{}`", name)),
        Err(e) => error_message(plugin, e),
    }
}

fn cmd_remove<H: Host, G: GearProvider>(
    player: PlayerId,
    plugin: &mut DancingNpcs<H, G>,
) -> CommandResult {
    match plugin.remove_in_sight(player) {
        Ok(()) => CommandResult::success("NPC removed"),
        Err(e) => error_message(plugin, e),
    }
}

fn cmd_clear<H: Host, G: GearProvider>(
    player: PlayerId,
    plugin: &mut DancingNpcs<H, G>,
) -> CommandResult {
    let removed = plugin.clear_owned(player);
    if removed == 0 {
        CommandResult::success("You have no NPCs to remove")
    } else {
        CommandResult::success(format!("Removed {} NPC(s)", removed))
    }
}

/// Maps a lifecycle error to a user message. Whether a bad gesture input was
/// a name or an index only matters here, at the message layer.
fn error_message<H: Host, G: GearProvider>(
    plugin: &DancingNpcs<H, G>,
    error: DanceError,
) -> CommandResult {
    let cmd = &plugin.config().command;
    let message = match &error {
        DanceError::GestureNotFound(input) => {
            if input.parse::<usize>().is_ok() {
                format!(
                    "Dance number {} is out of range, see /{} dances",
                    input, cmd
                )
            } else {
                format!("Unknown dance `{}`, see /{} dances", input, cmd)
            }
        }
        DanceError::GearSetNotFound(name) => {
            format!("Unknown gear set `{}`, see /{} gear", name, cmd)
        }
        DanceError::NoTarget => "You are not looking at one of your NPCs".to_string(),
        DanceError::AtCapacity(max) => {
            format!("You already have the maximum of {} NPCs", max)
        }
        DanceError::SpawnFailed => "The NPC could not be spawned".to_string(),
        DanceError::UnknownHandle => "That NPC is no longer tracked".to_string(),
        DanceError::GearUnavailable => "Gear could not be applied (is GearCore loaded?)"
            .to_string(),
    };
    CommandResult::error(message)
}
