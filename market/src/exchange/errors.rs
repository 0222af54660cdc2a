use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The engine side of the tick channel has gone away; the poller has
    /// nowhere to deliver and must stop.
    #[error("tick channel closed")]
    ChannelClosed,
}
