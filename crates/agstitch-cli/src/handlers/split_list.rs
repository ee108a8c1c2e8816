use crate::context::ExecutionContext;
use crate::presentation::presenters;
use crate::presentation::{ConsoleRenderer, Renderer};
use agstitch_runtime::SplitService;
use anyhow::Result;

pub fn handle(ctx: &ExecutionContext) -> Result<()> {
    let corpus = ctx.corpus();
    let groups = SplitService::new(&corpus, ctx.merged_dir()).detect()?;

    let view_model = presenters::present_split_list(&groups, ctx.preview_chars());
    ConsoleRenderer::new(ctx.format).render(view_model)
}
