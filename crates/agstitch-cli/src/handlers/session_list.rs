use crate::context::ExecutionContext;
use crate::presentation::presenters;
use crate::presentation::{ConsoleRenderer, Renderer};
use anyhow::Result;

pub fn handle(ctx: &ExecutionContext, limit: usize) -> Result<()> {
    let scope = ctx.scope()?;
    let sessions = ctx.corpus().list(&scope)?;

    let view_model = presenters::present_session_list(&sessions, &scope, limit, ctx.preview_chars());
    ConsoleRenderer::new(ctx.format).render(view_model)
}
