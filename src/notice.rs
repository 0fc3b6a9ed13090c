use tokio::sync::mpsc;
use tracing::info;

/// Informational output from external programs that is not an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// `pip install` succeeded; carries its stdout
    PackageInstalled { package: String, output: String },
    /// The translation script reported a first-run model download
    ModelDownload { model: String, output: String },
}

/// Logs notices and forwards them to an optional subscriber
#[derive(Debug, Clone, Default)]
pub struct NoticeSink {
    subscriber: Option<mpsc::UnboundedSender<Notice>>,
}

impl NoticeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink plus the receiving end that observes every emitted notice
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { subscriber: Some(tx) }, rx)
    }

    pub fn emit(&self, notice: Notice) {
        match &notice {
            Notice::PackageInstalled { package, output } => {
                info!("Installed {}:\n{}", package, output.trim_end());
            }
            Notice::ModelDownload { model, output } => {
                info!("Model {} download: {}", model, output);
            }
        }

        if let Some(subscriber) = &self.subscriber {
            // A dropped receiver only means nobody is listening any more.
            let _ = subscriber.send(notice);
        }
    }
}
