use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::Result;
use crate::translate::Translator;

/// Completion of one input text
#[derive(Debug)]
pub struct BatchItem {
    /// Position in the input
    pub index: usize,
    pub text: String,
    pub result: Result<String>,
}

/// Drives many texts through one translator, strictly one at a time
pub struct BatchDriver<'a> {
    translator: &'a mut Translator,
}

impl<'a> BatchDriver<'a> {
    pub fn new(translator: &'a mut Translator) -> Self {
        Self { translator }
    }

    /// Translate every text in order, calling `on_item` once per text.
    ///
    /// A failing text is reported and the batch moves on. If setup fails,
    /// `on_item` receives that error once and nothing is translated.
    pub async fn translate_all<S, F>(
        &mut self,
        texts: &[S],
        target_language: &str,
        model_index: Option<usize>,
        mut on_item: F,
    ) where
        S: AsRef<str>,
        F: FnMut(Result<String>),
    {
        if let Err(e) = self.translator.setup(false).await {
            warn!("Setup failed, skipping batch of {}: {}", texts.len(), e);
            on_item(Err(e));
            return;
        }

        for text in texts {
            let result = self
                .translator
                .translate(text.as_ref(), target_language, model_index)
                .await;
            if let Err(e) = &result {
                warn!("Error translating \"{}\": {}", text.as_ref(), e);
            }
            on_item(result);
        }
    }

    /// Translate every text in order, sending each completion to `events`.
    ///
    /// The bounded channel applies backpressure; the batch stops early once
    /// the receiver is dropped. Returns the number of items delivered, or
    /// the setup error before any item is sent.
    pub async fn translate_into<S>(
        &mut self,
        texts: &[S],
        target_language: &str,
        model_index: Option<usize>,
        events: mpsc::Sender<BatchItem>,
    ) -> Result<usize>
    where
        S: AsRef<str>,
    {
        self.translator.setup(false).await?;

        let mut delivered = 0;
        for (index, text) in texts.iter().enumerate() {
            let text = text.as_ref();
            let result = self.translator.translate(text, target_language, model_index).await;
            if let Err(e) = &result {
                warn!("Error translating \"{}\": {}", text, e);
            }

            let item = BatchItem {
                index,
                text: text.to_string(),
                result,
            };
            if events.send(item).await.is_err() {
                info!("Receiver dropped, stopping batch after {} of {} items", delivered, texts.len());
                break;
            }
            delivered += 1;
        }

        Ok(delivered)
    }
}
