pub mod audio;
pub mod cases;
pub mod filter;
pub mod pipeline;
pub mod plot;

pub use audio::{OutputFormat, Signal};
pub use cases::Case;
pub use filter::CombFilter;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Audio(#[from] audio::AudioError),
    #[error(transparent)]
    Filter(#[from] filter::FilterError),
    #[error(transparent)]
    Cases(#[from] cases::CaseError),
    #[error(transparent)]
    Plot(#[from] plot::PlotError),
}
