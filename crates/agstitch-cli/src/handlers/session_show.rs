use crate::context::ExecutionContext;
use crate::presentation::presenters;
use crate::presentation::{ConsoleRenderer, Renderer};
use anyhow::Result;

pub fn handle(ctx: &ExecutionContext, session_id: &str) -> Result<()> {
    let inspection = ctx.corpus().inspect(session_id)?;
    ConsoleRenderer::new(ctx.format).render(presenters::present_session_detail(inspection))
}
