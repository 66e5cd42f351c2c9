//! Sequential stage pipeline.
//!
//! Events are folded through a [`StageChain`]: an ordered list of
//! [`Stage`]s, each of which reads the accumulated [`PipelineResult`] and
//! returns an updated copy. A failing stage never aborts the chain.
//!
//! ```rust,ignore
//! let chain = StageChain::new("github")
//!     .add_stage(ContentFilterStage::from_config(&config.filter, policy.clone())?)
//!     .add_stage(ScoringStage::from_config(&config.scoring, policy)?);
//! let result = chain.execute(&event, PipelineResult::new()).await;
//! ```

pub mod chain;
pub mod registry;
pub mod result;
pub mod stage;

pub use chain::{StageChain, StageOutcome, StageTrace};
pub use registry::ChainRegistry;
pub use result::PipelineResult;
pub use stage::{CustomStage, EventMatcher, Stage};
