//! The main process for communicating over IRC and dispatching messages to plugins.
use futures::stream::StreamExt;
use irc::client::prelude::Client;
use irc::proto::Message;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::{Context, Error, Propagation, Registry};

/// The IRC bot that owns the connection and the loaded plugins.
pub struct Yabot {
    /// The plugin registry, in dispatch order
    registry: Registry,
    /// The shared context for plugins
    context: Context,
}

impl Yabot {
    /// Creates a new bot from the provided configuration.
    ///
    /// This initializes the shared context and the plugin registry but doesn't establish the IRC
    /// connection yet. Call [`Yabot::run`] to start the bot.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or a plugin fails to initialize.
    pub fn new(config: Config) -> Result<Self, Error> {
        let context = Context::new(config)?;
        let registry = Registry::preloaded(&context)?;

        Ok(Self { registry, context })
    }

    /// Connects to the IRC server and processes messages until the connection closes.
    ///
    /// # Errors
    ///
    /// This function will return an error in the following situations:
    ///
    /// - [`Error::IrcClient`] - if the instantiation of the IRC client fails (e.g. due to
    ///   configuration issues.)
    /// - [`Error::IrcRegistration`] - if user registration fails.
    /// - [`Error::Irc`] - if a protocol or communication error occurred.
    ///
    /// Plugin errors are logged and do not stop the bot.
    pub async fn run(&self) -> Result<(), Error> {
        let irc_config = self.context.config.irc.clone();

        info!(hostname = %irc_config.hostname, port = irc_config.port(), "connecting");

        let mut client = Client::from_config(irc_config.into())
            .await
            .map_err(Error::IrcClient)?;

        client.identify().map_err(Error::IrcRegistration)?;

        let mut stream = client.stream()?;

        while let Some(message) = stream.next().await.transpose()? {
            self.handle_message(&client, &message).await;
        }

        info!("connection closed");

        Ok(())
    }

    /// Dispatches a single IRC message to the registered plugins, in order.
    ///
    /// Dispatch ends early when a plugin consumes the message or fails. A failing plugin is
    /// reported in the log and the message is dropped.
    async fn handle_message(&self, client: &Client, message: &Message) {
        debug!(?message, "processing irc message");

        for entry in &self.registry.plugins {
            match entry.plugin.handle_message(message, client).await {
                Ok(Propagation::Continue) => {}
                Ok(Propagation::Stop) => {
                    debug!(plugin = %entry.name, "message consumed");
                    break;
                }
                Err(err) => {
                    error!(plugin = %entry.name, error = ?err, ?message, "plugin failed");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use httpmock::prelude::*;

    use super::*;
    use crate::plugin::tests::{message, mock_client, test_context, test_context_for};
    use crate::plugin::{Author, Entry, Name, Plugin, Version};

    const PPM: &str = ":alice!alice@example.org PRIVMSG #yacy :.ppm";

    /// Counts its invocations and answers with a fixed result; `None` fails.
    struct Scripted {
        answer: Option<Propagation>,
        hits: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Plugin for Scripted {
        fn name() -> Name {
            Name::from("scripted")
        }

        fn author() -> Author {
            Author::from("Mikkel Kroman <mk@maero.dk>")
        }

        fn version() -> Version {
            Version::from("0.1")
        }

        fn new(_ctx: &Context) -> Result<Self, Error> {
            Ok(Self {
                answer: Some(Propagation::Continue),
                hits: Arc::default(),
            })
        }

        async fn handle_message(
            &self,
            _message: &Message,
            _client: &Client,
        ) -> Result<Propagation, Error> {
            self.hits.fetch_add(1, Ordering::SeqCst);

            self.answer
                .ok_or_else(|| Error::Plugin("peer unreachable".into()))
        }
    }

    fn scripted(name: &'static str, answer: Option<Propagation>) -> (Entry, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let plugin = Scripted {
            answer,
            hits: Arc::clone(&hits),
        };

        (
            Entry {
                name: Name::from(name),
                plugin: Box::new(plugin),
            },
            hits,
        )
    }

    fn bot_with(entries: Vec<Entry>) -> Yabot {
        Yabot {
            registry: Registry { plugins: entries },
            context: test_context(),
        }
    }

    #[tokio::test]
    async fn continue_reaches_every_plugin() {
        let (first, first_hits) = scripted("first", Some(Propagation::Continue));
        let (second, second_hits) = scripted("second", Some(Propagation::Continue));
        let bot = bot_with(vec![first, second]);
        let client = mock_client().await;

        bot.handle_message(&client, &message(PPM)).await;

        assert_eq!(first_hits.load(Ordering::SeqCst), 1);
        assert_eq!(second_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stop_ends_dispatch() {
        let (first, first_hits) = scripted("first", Some(Propagation::Stop));
        let (second, second_hits) = scripted("second", Some(Propagation::Continue));
        let bot = bot_with(vec![first, second]);
        let client = mock_client().await;

        bot.handle_message(&client, &message(PPM)).await;

        assert_eq!(first_hits.load(Ordering::SeqCst), 1);
        assert_eq!(second_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn plugin_error_drops_message_and_keeps_dispatching_later_ones() {
        let (failing, failing_hits) = scripted("failing", None);
        let (second, second_hits) = scripted("second", Some(Propagation::Continue));
        let bot = bot_with(vec![failing, second]);
        let client = mock_client().await;

        bot.handle_message(&client, &message(PPM)).await;
        bot.handle_message(&client, &message(PPM)).await;

        assert_eq!(failing_hits.load(Ordering::SeqCst), 2);
        assert_eq!(second_hits.load(Ordering::SeqCst), 0);
    }

    #[cfg(feature = "plugin-yacy-status")]
    #[tokio::test]
    async fn preloaded_bot_answers_ppm_and_consumes_it() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/xml/status_p.xml");
                then.status(200).body("<status>\n  <ppm>42</ppm>\n</status>\n");
            })
            .await;
        let context = test_context_for(&server.base_url(), Some("secret"));
        let mut registry = Registry::preloaded(&context).unwrap();
        let (after, after_hits) = scripted("after", Some(Propagation::Continue));
        registry.plugins.push(after);
        let bot = Yabot { registry, context };
        let client = mock_client().await;

        bot.handle_message(&client, &message(PPM)).await;
        bot.handle_message(&client, &message(":alice!alice@example.org PRIVMSG #yacy :hi"))
            .await;

        mock.assert_hits_async(1).await;
        assert_eq!(after_hits.load(Ordering::SeqCst), 1);
    }
}
