//! Notation transform service
//!
//! Runs the pipeline raw text → normalize → parse → duplicate policy → render,
//! using the parser and printer configured in [`Settings`].

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{normalize, Format, Tree, TreeParser, TreePrinter};

/// Shape summary of a parsed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
    /// Number of `(parent, label)` pairs with repeated sibling labels
    pub duplicates: usize,
}

/// Outcome for one input line of a batch.
#[derive(Debug)]
pub struct BatchLine {
    /// 1-based line number in the batch input
    pub line: usize,
    pub input: String,
    pub result: ApplicationResult<String>,
}

/// Service turning notation strings into renderings.
pub struct TransformService {
    settings: Settings,
    parser: TreeParser,
    printer: TreePrinter,
}

impl TransformService {
    pub fn new(settings: Settings) -> Self {
        let parser = settings.parser();
        let printer = settings.printer();
        Self {
            settings,
            parser,
            printer,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Parse raw notation; whitespace anywhere is ignored.
    #[instrument(level = "debug", skip(self))]
    pub fn parse(&self, raw: &str) -> ApplicationResult<Tree> {
        let normalized = normalize(raw);
        debug!("parse: normalized={:?}", normalized);
        let tree = self.parser.parse(&normalized)?;
        let tree = tree.apply_duplicate_policy(self.settings.parse.duplicates)?;
        Ok(tree)
    }

    pub fn render(&self, tree: &Tree, format: Format) -> String {
        self.printer.render_as(tree, format)
    }

    /// Parse and render in one step.
    pub fn transform(&self, raw: &str, format: Format) -> ApplicationResult<String> {
        let tree = self.parse(raw)?;
        Ok(self.render(&tree, format))
    }

    pub fn stats(&self, tree: &Tree) -> TreeStats {
        TreeStats {
            nodes: tree.node_count(),
            leaves: tree.leaf_labels().len(),
            depth: tree.depth(),
            duplicates: tree.duplicate_siblings().len(),
        }
    }

    /// Transform one notation per line.
    ///
    /// Blank lines and lines starting with `#` are skipped. Lines are processed
    /// in parallel with rayon; results keep input order and a failing line
    /// does not affect the others.
    #[instrument(level = "debug", skip_all)]
    pub fn transform_batch(&self, content: &str, format: Format) -> Vec<BatchLine> {
        let lines: Vec<(usize, &str)> = content
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(_, line)| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !trimmed.starts_with('#')
            })
            .collect();
        debug!("transform_batch: {} notations", lines.len());

        // Parallel transform
        lines
            .par_iter()
            .map(|&(line, input)| BatchLine {
                line,
                input: input.to_string(),
                result: self.transform(input, format),
            })
            .collect()
    }
}
