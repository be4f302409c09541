//! Per-declaration pipeline and batch processing.
//!
//! A declaration either produces its full output or an error; nothing is
//! shared between declarations, so a batch can run on a thread pool and still
//! return results in declaration order.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::constants::GENERATED_HEADER;
use crate::emit::{BlockKind, CodeEmitter, TextBlock};
use crate::errors::{ErrorKind, RouteGenError, SourceRef};
use crate::helpers::HelperRegistry;
use crate::model::RouteDeclaration;
use crate::provider::TypeInfoProvider;
use crate::tree::RouteTree;

/// Everything emitted for one top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    declaration: String,
    blocks: Vec<TextBlock>,
}

impl GeneratedOutput {
    /// The declaration this output belongs to.
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    /// Route, enum and helper blocks in emission order.
    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    /// Only the helper blocks.
    pub fn helpers(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter(|b| b.kind == BlockKind::Helper)
    }

    /// The concatenated text.
    pub fn text(&self) -> String {
        join_blocks(&self.blocks)
    }
}

/// Drives tree building, emission and helper collection.
pub struct Generator<'a, P: ?Sized> {
    provider: &'a P,
    config: &'a GeneratorConfig,
    helpers: HelperRegistry,
}

impl<'a, P> Generator<'a, P>
where
    P: TypeInfoProvider + ?Sized,
{
    /// Generator over `provider` with the standard helper catalog.
    pub const fn new(provider: &'a P, config: &'a GeneratorConfig) -> Self {
        Self {
            provider,
            config,
            helpers: HelperRegistry::standard(),
        }
    }

    /// Generate one declaration.
    pub fn generate(
        &self,
        declaration: &RouteDeclaration,
    ) -> Result<GeneratedOutput, RouteGenError> {
        let at = SourceRef::declaration(declaration.type_name.as_str());
        let emitter = CodeEmitter::new(self.provider, self.config)
            .map_err(|e| RouteGenError::new(ErrorKind::InvalidIdentifier, at.clone(), e.to_string()))?;

        let tree = RouteTree::build(declaration, self.provider, self.config)?;
        let mut blocks = emitter.emit(&tree)?;
        let helpers = self.helpers.emit(&blocks, emitter.runtime(), &at)?;
        debug!(
            declaration = %declaration.type_name,
            nodes = tree.nodes().len(),
            blocks = blocks.len(),
            helpers = helpers.len(),
            "generated declaration"
        );
        blocks.extend(helpers);

        Ok(GeneratedOutput {
            declaration: declaration.type_name.clone(),
            blocks,
        })
    }

    /// Generate every declaration in order; failures do not stop the batch.
    pub fn generate_batch(
        &self,
        declarations: &[RouteDeclaration],
    ) -> Vec<Result<GeneratedOutput, RouteGenError>> {
        declarations.iter().map(|d| self.generate(d)).collect()
    }

    /// [`generate_batch`](Self::generate_batch) on a pool of `jobs` threads.
    ///
    /// `jobs == 0` uses one thread per core. Results keep declaration order.
    pub fn generate_batch_parallel(
        &self,
        declarations: &[RouteDeclaration],
        jobs: usize,
    ) -> Result<Vec<Result<GeneratedOutput, RouteGenError>>, rayon::ThreadPoolBuildError>
    where
        P: Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
        info!(
            declarations = declarations.len(),
            threads = pool.current_num_threads(),
            "generating in parallel"
        );
        Ok(pool.install(|| {
            declarations
                .par_iter()
                .map(|d| self.generate(d))
                .collect()
        }))
    }
}

/// Merge several outputs into one source file.
///
/// Identical route and enum blocks are kept once; helpers are deduplicated by
/// name and appended after everything else, in first-seen order.
pub fn assemble_library<'o, I>(outputs: I) -> String
where
    I: IntoIterator<Item = &'o GeneratedOutput>,
{
    let mut seen = HashSet::new();
    let mut body = Vec::new();
    let mut helpers = Vec::new();

    for output in outputs {
        for block in &output.blocks {
            if !seen.insert(block) {
                continue;
            }
            if block.kind == BlockKind::Helper {
                helpers.push(block.clone());
            } else {
                body.push(block.clone());
            }
        }
    }

    let mut helper_names = HashSet::new();
    helpers.retain(|h| helper_names.insert(h.key.clone()));
    body.extend(helpers);

    format!("{GENERATED_HEADER}\n\n{}", join_blocks(&body))
}

fn join_blocks(blocks: &[TextBlock]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
