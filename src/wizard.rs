pub mod node;
pub mod reference;
pub mod session;
pub mod tree;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::WizardConfig;
use crate::input::{parse_command, Command};
use node::DecisionNode;
use reference::{ConditionEffect, QuickReference, SpecialAbility};
use session::{ChooseOutcome, Session, SessionError};
use tree::{Role, TreeStore};

const ATTRIBUTION: &str =
    "Based on the PFSPrep Grapple Flowchart v1.0 • Pathfinder 1st Edition Rules";

/// Whether the loop keeps going after a command.
enum Flow {
    Continue,
    Quit,
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

fn show_banner(out: &mut impl Write) -> Result<()> {
    writeln!(out, "\n========================================")?;
    writeln!(out, "        PATHFINDER GRAPPLE WIZARD")?;
    writeln!(out, "========================================")?;
    writeln!(out, "{ATTRIBUTION}")?;
    Ok(())
}

fn show_role_selector(out: &mut impl Write) -> Result<()> {
    writeln!(out, "\nWho Are You?")?;
    writeln!(out, "Select your role in the grapple\n")?;
    for (i, role) in Role::ALL.iter().enumerate() {
        let info = role.info();
        writeln!(out, "  [{}] {} {}", i + 1, info.icon, info.title)?;
        writeln!(out, "      {}", info.description)?;
    }
    writeln!(out, "\n  [?] Reference    [q] Quit")?;
    Ok(())
}

fn show_breadcrumbs(out: &mut impl Write, session: &Session) -> Result<()> {
    let crumbs = session.breadcrumbs();
    if crumbs.len() > 1 {
        writeln!(out, "{}", crumbs.join(" › "))?;
    }
    Ok(())
}

fn show_node(out: &mut impl Write, node: &DecisionNode, config: &WizardConfig) -> Result<()> {
    writeln!(out, "\n== {} ==", node.title)?;
    writeln!(out, "{}", node.body)?;

    if config.show_mechanics {
        if let Some(mechanics) = &node.mechanics {
            writeln!(out, "\n+-- Mechanics ----------------------------")?;
            for line in mechanics.lines() {
                writeln!(out, "| {line}")?;
            }
            writeln!(out, "+----------------------------------------")?;
        }
    }

    if config.show_tips && !node.tips.is_empty() {
        writeln!(out, "\nTips:")?;
        for tip in &node.tips {
            writeln!(out, "  • {tip}")?;
        }
    }

    if !node.choices.is_empty() {
        writeln!(out)?;
        for (i, choice) in node.choices.iter().enumerate() {
            writeln!(out, "  [{}] {}", i + 1, choice.label)?;
            if let Some(description) = &choice.description {
                writeln!(out, "      {description}")?;
            }
        }
    }

    if node.is_result() {
        writeln!(out, "\n------------- What now? -------------")?;
    }
    Ok(())
}

fn show_screen(
    out: &mut impl Write,
    session: &Session,
    role: Role,
    config: &WizardConfig,
) -> Result<()> {
    let info = role.info();
    writeln!(
        out,
        "\n[{} {}]  step {}",
        info.icon,
        info.title,
        session.history().len()
    )?;
    show_breadcrumbs(out, session)?;

    match session.current_node() {
        Ok(node) => show_node(out, node, config)?,
        Err(SessionError::NodeNotFound { node_id, .. }) => {
            warn!("Rendering missing node '{node_id}' for the {role} tree");
            writeln!(out, "\nError: Node not found ({node_id})")?;
        }
        Err(SessionError::NoRole) => {}
    }

    let mut nav = vec!["[b] Go back"];
    if session.is_at_result() {
        nav.push("[r] Start over");
    }
    nav.extend(["[c] Change role", "[?] Reference", "[q] Quit"]);
    writeln!(out, "\n  {}", nav.join("    "))?;
    Ok(())
}

fn show_condition(out: &mut impl Write, condition: &ConditionEffect) -> Result<()> {
    writeln!(out, "\n{}", condition.name)?;
    for effect in &condition.effects {
        writeln!(out, "  • {effect}")?;
    }
    Ok(())
}

fn show_ability(out: &mut impl Write, ability: &SpecialAbility) -> Result<()> {
    writeln!(out, "\n{}", ability.name)?;
    writeln!(out, "  {}", ability.description)?;
    for effect in &ability.effects {
        writeln!(out, "  • {effect}")?;
    }
    Ok(())
}

/// Print the whole quick reference, or only the entry named by `topic`.
fn show_reference(
    out: &mut impl Write,
    reference: &QuickReference,
    topic: Option<&str>,
) -> Result<()> {
    if let Some(key) = topic {
        if let Some(condition) = reference.condition(key) {
            return show_condition(out, condition);
        }
        if let Some(ability) = reference.ability(key) {
            return show_ability(out, ability);
        }
        let keys: Vec<&str> = reference
            .conditions
            .iter()
            .map(|c| c.key.as_str())
            .chain(reference.abilities.iter().map(|a| a.key.as_str()))
            .collect();
        writeln!(out, "  No reference entry for '{key}'. Try one of: {}", keys.join(", "))?;
        return Ok(());
    }

    writeln!(out, "\n---------- Conditions Reference ----------")?;
    for condition in &reference.conditions {
        show_condition(out, condition)?;
    }

    writeln!(out, "\n--- Special Abilities (Grab, Constrict, Feats) ---")?;
    for ability in &reference.abilities {
        show_ability(out, ability)?;
    }
    writeln!(out, "\n{ATTRIBUTION}")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Input handling
// ---------------------------------------------------------------------------

/// Prompt and read one trimmed line. `None` once input is exhausted.
fn read_line(input: &mut impl BufRead, out: &mut impl Write) -> Result<Option<String>> {
    write!(out, "\n> ")?;
    out.flush()?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn pick_role(session: &mut Session, command: Command, out: &mut impl Write) -> Result<()> {
    let role = match command {
        Command::Pick(n) => n.checked_sub(1).and_then(|i| Role::ALL.get(i).copied()),
        Command::Name(name) => name.parse().ok(),
        _ => None,
    };
    match role {
        Some(role) => session.select_role(role),
        None => writeln!(out, "  Pick a role from 1 to {}.", Role::ALL.len())?,
    }
    Ok(())
}

fn pick_choice(session: &mut Session, command: Command, out: &mut impl Write) -> Result<()> {
    let choice_id = match (&command, session.current_node()) {
        (Command::Pick(n), Ok(node)) => n
            .checked_sub(1)
            .and_then(|i| node.choices.get(i))
            .map(|c| c.id.clone()),
        (Command::Name(name), _) => Some(name.clone()),
        _ => None,
    };
    let Some(choice_id) = choice_id else {
        writeln!(out, "  That isn't one of the options.")?;
        return Ok(());
    };

    match session.choose(&choice_id) {
        ChooseOutcome::Advanced => {}
        ChooseOutcome::UnknownChoice | ChooseOutcome::NoRole | ChooseOutcome::NodeMissing => {
            writeln!(out, "  That isn't one of the options.")?
        }
        ChooseOutcome::Unwired | ChooseOutcome::Dangling => {
            writeln!(out, "  That option doesn't lead anywhere yet.")?
        }
    }
    Ok(())
}

fn apply(
    session: &mut Session,
    command: Command,
    store: &TreeStore,
    out: &mut impl Write,
) -> Result<Flow> {
    match command {
        Command::Quit => return Ok(Flow::Quit),
        Command::Reference(topic) => show_reference(out, store.reference(), topic.as_deref())?,
        Command::Back if session.can_go_back() => session.go_back(),
        Command::Back => writeln!(out, "  Nothing to go back to.")?,
        Command::Restart | Command::ChangeRole => {
            info!("Player chose to start over");
            session.reset();
        }
        pick @ (Command::Pick(_) | Command::Name(_)) => {
            if session.role().is_none() {
                pick_role(session, pick, out)?;
            } else {
                pick_choice(session, pick, out)?;
            }
        }
    }
    Ok(Flow::Continue)
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Drive one wizard session over arbitrary input and output streams until the
/// player quits or input runs out.
pub fn run_with(
    input: &mut impl BufRead,
    out: &mut impl Write,
    store: &TreeStore,
    config: &WizardConfig,
) -> Result<()> {
    let mut session = Session::new(store);
    if let Some(role) = config.start_role {
        session.select_role(role);
    }

    show_banner(out)?;

    loop {
        match session.role() {
            None => show_role_selector(out)?,
            Some(role) => show_screen(out, &session, role, config)?,
        }

        let Some(line) = read_line(input, out)? else {
            info!("Input closed");
            break;
        };
        if line.is_empty() {
            writeln!(out, "(Please pick an option.)")?;
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "  {err}. Type a number, [b] to go back or [q] to quit.")?;
                continue;
            }
        };

        if let Flow::Quit = apply(&mut session, command, store, out)? {
            break;
        }
    }

    writeln!(out, "\nGood luck with the grapple!")?;
    Ok(())
}

pub fn run(store: &TreeStore, config: &WizardConfig) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with(&mut stdin.lock(), &mut stdout.lock(), store, config)
}
