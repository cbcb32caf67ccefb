//! Real-time Module
//!
//! Wake-up plumbing between writers (publish, clear) and long-poll feed
//! calls. See [`notifier::FeedNotifier`].

/// Per-conversation feed notifier
pub mod notifier;

pub use notifier::FeedNotifier;
