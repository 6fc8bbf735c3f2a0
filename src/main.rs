use anyhow::Context;
use clap::Parser;
use classbookd::config::Config;
use classbookd::model::SubjectRef;
use classbookd::{ipc, logging, roster};
use std::io::{self, BufRead, Write};

fn preload(state: &mut ipc::AppState, config: &Config) -> anyhow::Result<()> {
    let Some(path) = config.roster_path.as_deref() else {
        return Ok(());
    };
    let records = roster::load_roster(path)?;
    let subject: Option<SubjectRef> = match config.roster_subject.as_deref() {
        Some(name) => Some(state.term.add_subject(name, None)?.into()),
        None => None,
    };
    let ids = roster::import_roster(&mut state.term, &records, subject)
        .with_context(|| format!("failed to import roster {}", path.display()))?;
    tracing::info!(path = %path.display(), students = ids.len(), "startup roster loaded");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init_tracing(&config.log_level);

    let mut state = ipc::AppState::new();
    preload(&mut state, &config)?;
    tracing::info!(session_id = %state.term.session_id(), "classbookd ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                tracing::warn!(error = %e, "unparseable request line");
                let _ = writeln!(stdout, "{}", ipc::bad_json(&e.to_string()));
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
    Ok(())
}
