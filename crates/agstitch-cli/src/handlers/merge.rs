use super::progress;
use crate::context::ExecutionContext;
use crate::presentation::presenters;
use crate::presentation::{ConsoleRenderer, Renderer};
use agstitch_runtime::{MergePipeline, MergeRequest};
use anyhow::Result;
use std::path::PathBuf;

pub struct MergeArgs {
    pub sessions: Vec<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub delete: bool,
    pub dry_run: bool,
    pub target_dir: Option<PathBuf>,
}

pub fn handle(ctx: &ExecutionContext, args: MergeArgs) -> Result<()> {
    let corpus = ctx.corpus();
    let request = MergeRequest {
        title: args.name,
        session_id: args.id,
        target_dir: args.target_dir,
        delete_sources: args.delete,
        dry_run: args.dry_run,
    };

    let outcome = MergePipeline::new(&corpus).run(&args.sessions, &request, |event| {
        progress::report_merge(&event)
    })?;

    ConsoleRenderer::new(ctx.format).render(presenters::present_merge(&outcome))
}
