use super::progress;
use crate::context::ExecutionContext;
use crate::presentation::presenters;
use crate::presentation::{ConsoleRenderer, Renderer};
use agstitch_runtime::SplitService;
use anyhow::{Context, Result, bail};
use is_terminal::IsTerminal;
use std::io::{self, BufRead, Write};

pub fn handle(ctx: &ExecutionContext, yes: bool, delete: bool, dry_run: bool) -> Result<()> {
    let corpus = ctx.corpus();
    let merged_dir = ctx.merged_dir();
    let service = SplitService::new(&corpus, merged_dir.clone());

    let groups = service.detect()?;
    if groups.is_empty() {
        let view_model = presenters::present_split_list(&groups, ctx.preview_chars());
        return ConsoleRenderer::new(ctx.format).render(view_model);
    }

    if !dry_run && !yes {
        let sessions: usize = groups.iter().map(|g| g.members.len()).sum();
        let question = format!(
            "Merge {} sessions in {} group(s) into {}{}?",
            sessions,
            groups.len(),
            merged_dir.display(),
            if delete { " and delete the sources" } else { "" }
        );
        if !confirm(&question)? {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let outcomes = service.merge_groups(groups, delete, dry_run, |event| {
        progress::report_split(&event)
    });
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let total = outcomes.len();

    ConsoleRenderer::new(ctx.format).render(presenters::present_split_merge(
        &outcomes,
        dry_run,
        &merged_dir,
    ))?;

    if failed > 0 {
        bail!("{} of {} groups failed to merge", failed, total);
    }
    Ok(())
}

/// One yes/no question on stderr. Refuses when stdin is not a terminal.
fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        bail!("Refusing to merge without confirmation on a non-interactive terminal; pass --yes");
    }

    eprint!("{} [y/N] ", question);
    io::stderr().flush()?;

    let mut answer = String::new();
    stdin
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
