//! Dispatch parsed commands to an arena and render the results as text.

use dice_race::{ArenaHandle, ArenaResponse, MatchView, Player, profile::Profile};

use crate::commands::{Command, USAGE};

/// What the terminal should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print these lines and keep reading
    Print(Vec<String>),
    /// Stop reading input
    Quit,
}

/// Run one command against the arena.
///
/// # Errors
///
/// Returns an error if the arena has stopped.
pub async fn dispatch(handle: &ArenaHandle, command: Command) -> Result<Reply, String> {
    let label = command.to_string();
    let response = match command {
        Command::Solo => handle.start_solo().await?,
        Command::Challenge(id) => handle.send_invite(&id).await?,
        Command::Incoming(id) => handle.receive_invite(&id).await?,
        Command::Accept => handle.accept_invite(None).await?,
        Command::Decline => handle.decline_invite(None).await?,
        Command::Roll => handle.roll().await?,
        Command::Lobby => handle.return_to_lobby().await?,
        Command::Status => return Ok(Reply::Print(render_view(&handle.view().await?))),
        Command::Roster => return Ok(Reply::Print(render_roster(&handle.roster().await?))),
        Command::Profile => return Ok(Reply::Print(vec![render_profile(&handle.profile().await?)])),
        Command::Help => return Ok(Reply::Print(USAGE.lines().map(str::to_string).collect())),
        Command::Quit => return Ok(Reply::Quit),
    };

    if !response.is_success() {
        log::debug!("'{label}' not applied: {response:?}");
    }
    Ok(Reply::Print(render_response(&response)))
}

/// Only failures need a line; successes show up as notifications.
pub fn render_response(response: &ArenaResponse) -> Vec<String> {
    match response {
        ArenaResponse::Rejected(e) => vec![format!("! {e}")],
        ArenaResponse::Error(e) => vec![format!("! {e}")],
        _ => Vec::new(),
    }
}

pub fn render_view(view: &MatchView) -> Vec<String> {
    let mut lines = vec![format!("status: {}", view.status)];

    if let Some(invite) = &view.pending_invite {
        if invite.is_pending() {
            lines.push(format!("waiting on {} to accept", invite.counterpart().display_name));
        }
    }

    if view.match_id.is_some() {
        let rolling = if view.local_rolling { " (rolling)" } else { "" };
        lines.push(format!(
            "you: {}/{}{rolling}",
            view.local_score, view.target_score
        ));
        if let Some(opponent) = &view.opponent {
            let rolling = if opponent.rolling { " (rolling)" } else { "" };
            lines.push(format!(
                "{}: {}/{}{rolling}",
                opponent.display_name, opponent.score, view.target_score
            ));
        }
        lines.extend(view.log.iter().map(|line| format!("  {line}")));
    }

    if view.status.is_finished() {
        lines.push("type 'lobby' to go again".to_string());
    }

    let pending: Vec<&str> = view
        .inbound_invites
        .iter()
        .filter(|i| i.is_pending())
        .map(|i| i.counterpart().display_name.as_str())
        .collect();
    if !pending.is_empty() {
        lines.push(format!("challenges from: {}", pending.join(", ")));
    }
    lines
}

pub fn render_roster(roster: &[Player]) -> Vec<String> {
    roster
        .iter()
        .map(|p| format!("{:<12} {}", p.id, p.display_name))
        .collect()
}

pub fn render_profile(profile: &Profile) -> String {
    format!(
        "{} (@{}): {} points, {} gems",
        profile.display_name, profile.username, profile.points, profile.gems
    )
}
