use fence::{
    CodeBlock, Document, Edit, compute_replacement, locate_adjacent_output_block,
    locate_enclosing_block, scan_blocks,
};
use log::{debug, info, warn};

use crate::backend::Backend;
use crate::dispatch::{Route, Target, route};
use crate::error::RunError;
use crate::outcome::RunOutcome;
use crate::settings::Settings;

/// What one completed run did to the document.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub block: CodeBlock,
    pub outcome: RunOutcome,
    pub edit: Edit,
}

/// Run the block enclosing `anchor` and write its output block.
///
/// Locate and route failures return before any request or mutation.
/// Transport failures become the output text.
pub async fn run_block<D, B>(
    doc: &mut D,
    anchor: usize,
    settings: &Settings,
    backend: &B,
) -> Result<RunReport, RunError>
where
    D: Document + ?Sized,
    B: Backend,
{
    let block = locate_enclosing_block(&*doc, anchor)?;
    let route = match route(&block.language, block.body(&*doc), settings) {
        Ok(route) => route,
        Err(source) => return Err(RunError::Route { block, source }),
    };
    let outcome = send(&route, backend).await;
    Ok(write_outcome(doc, block, outcome))
}

/// Run every runnable block from the top of the document, one at a time.
///
/// Blocks in unknown or disabled languages, including previous `output`
/// blocks, are skipped.
pub async fn run_all<D, B>(doc: &mut D, settings: &Settings, backend: &B) -> Vec<RunReport>
where
    D: Document + ?Sized,
    B: Backend,
{
    let mut reports = Vec::new();
    let mut next_line = 0;

    loop {
        // Line numbers shift after every write, so rescan each time.
        let next = scan_blocks(&*doc)
            .into_iter()
            .filter(|block| block.start_line >= next_line)
            .find_map(|block| match Target::resolve(&block.language, settings) {
                Ok(target) => Some((block, target)),
                Err(error) => {
                    debug!("skipping block on line {}: {}", block.start_line + 1, error);
                    None
                }
            });
        let Some((block, target)) = next else {
            break;
        };

        let route = target.request(block.body(&*doc), settings);
        let outcome = send(&route, backend).await;
        let report = write_outcome(doc, block, outcome);
        next_line = report.block.end_line + 1;
        reports.push(report);
    }

    reports
}

/// Issue the single request for `route`.
pub async fn send<B: Backend>(route: &Route, backend: &B) -> RunOutcome {
    match route {
        Route::Execute(request) => {
            info!(
                "running {} block ({} bytes, kernel: {})",
                request.language,
                request.code.len(),
                request.kernel
            );
            match backend.execute(request).await {
                Ok(response) => RunOutcome::from_execution(&response),
                Err(error) => {
                    warn!("{} run failed: {}", request.language, error);
                    RunOutcome::from_transport(&error, false)
                }
            }
        }
        Route::Llm(request) => {
            info!(
                "sending {} prompt ({} bytes)",
                request.mode,
                request.prompt.len()
            );
            match backend.complete(request).await {
                Ok(response) => RunOutcome::from_llm(response),
                Err(error) => {
                    warn!("{} request failed: {}", request.mode, error);
                    RunOutcome::from_transport(&error, true)
                }
            }
        }
    }
}

/// The output block is looked up again here: the document is whatever it
/// is once the response arrives.
fn write_outcome<D: Document + ?Sized>(
    doc: &mut D,
    block: CodeBlock,
    outcome: RunOutcome,
) -> RunReport {
    let existing = locate_adjacent_output_block(&*doc, block.end_line);
    let edit = compute_replacement(block.end_line, existing.as_ref(), &outcome.text);
    edit.apply(doc);
    RunReport {
        block,
        outcome,
        edit,
    }
}
