//! Plugin trait and registry
use async_trait::async_trait;
use irc::client::Client;
use irc::proto::Message;
use tracing::debug;

use crate::{Context, Error};

/// The name of a plugin.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Name(&'static str);
/// The author of a plugin.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Author(&'static str);
/// The version of a plugin.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Version(&'static str);

macro_rules! impl_static_str {
    ($($ty:ident),*) => {
        $(
            impl From<&'static str> for $ty {
                fn from(s: &'static str) -> Self {
                    Self(s)
                }
            }

            impl AsRef<str> for $ty {
                fn as_ref(&self) -> &str {
                    self.0
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.0)
                }
            }
        )*
    };
}

impl_static_str!(Name, Author, Version);

/// Report the crawl rate of a YaCy peer
#[cfg(feature = "plugin-yacy-status")]
pub mod yacy_status;

/// Common includes used in plugins.
#[allow(unused)]
mod prelude {
    pub use super::{Author, Name, Plugin, Propagation, Version};
    pub use crate::Context;
    pub use crate::Error as YabotError;
    pub use crate::command::Command as YabotCommand;
    pub use async_trait::async_trait;
    pub use irc::client::Client;
    pub use irc::proto::{Command, Message};
}

/// Tells the dispatcher whether later plugins should see a message.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Propagation {
    /// Pass the message on to the next plugin.
    Continue,
    /// The message has been consumed.
    Stop,
}

/// The base trait that all plugins must implement.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Returns the name of the plugin.
    fn name() -> Name
    where
        Self: Sized;

    /// Returns the author of the plugin.
    fn author() -> Author
    where
        Self: Sized;

    /// Returns the version of the plugin.
    fn version() -> Version
    where
        Self: Sized;

    /// The constructor for a new plugin.
    ///
    /// # Errors
    ///
    /// Returns an error if the plugin cannot be configured from the context.
    fn new(ctx: &Context) -> Result<Self, Error>
    where
        Self: Sized;

    /// Process an IRC protocol message.
    async fn handle_message(
        &self,
        _message: &Message,
        _client: &Client,
    ) -> Result<Propagation, Error> {
        Ok(Propagation::Continue)
    }
}

/// A registered plugin along with its name.
pub struct Entry {
    /// The name the plugin was registered under.
    pub name: Name,
    /// The plugin instance.
    pub plugin: Box<dyn Plugin>,
}

/// Plugin registry.
#[derive(Default)]
pub struct Registry {
    /// List of loaded plugins, in dispatch order.
    pub plugins: Vec<Entry>,
}

impl Registry {
    /// Constructs and returns a new, empty plugin registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { plugins: vec![] }
    }

    /// Constructs and returns a new plugin registry with initialized plugins.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the enabled plugins fail to initialize.
    #[allow(unused_variables)]
    pub fn preloaded(ctx: &Context) -> Result<Self, Error> {
        let mut registry = Self::new();
        debug!("registering plugins");

        #[cfg(feature = "plugin-yacy-status")]
        registry.register::<yacy_status::YacyStatus>(ctx)?;

        let num_plugins = registry.plugins.len();
        debug!(%num_plugins, "finished registering plugins");

        Ok(registry)
    }

    /// Registers a new plugin based on its type.
    ///
    /// # Errors
    ///
    /// Returns the error of the plugins constructor, if any.
    pub fn register<P: Plugin + 'static>(&mut self, ctx: &Context) -> Result<(), Error> {
        let name = P::name();
        let plugin = Box::new(P::new(ctx)?);

        debug!(%name, author = %P::author(), version = %P::version(), "registered plugin");

        self.plugins.push(Entry { name, plugin });

        Ok(())
    }

    #[cfg(test)]
    fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|entry| entry.name.as_ref() == name)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{Config, IrcConfig, TracingConfig, YacyConfig};

    struct Noop;

    #[async_trait]
    impl Plugin for Noop {
        fn name() -> Name {
            Name("noop")
        }

        fn author() -> Author {
            Author("Mikkel Kroman <mk@maero.dk>")
        }

        fn version() -> Version {
            Version("0.1")
        }

        fn new(_ctx: &Context) -> Result<Self, Error> {
            Ok(Noop)
        }
    }

    struct Broken;

    #[async_trait]
    impl Plugin for Broken {
        fn name() -> Name {
            Name("broken")
        }

        fn author() -> Author {
            Author("Mikkel Kroman <mk@maero.dk>")
        }

        fn version() -> Version {
            Version("0.1")
        }

        fn new(_ctx: &Context) -> Result<Self, Error> {
            Err(Error::Plugin("missing settings".into()))
        }
    }

    pub(crate) fn test_context() -> Context {
        test_context_for("http://localhost:8090", None)
    }

    pub(crate) fn test_context_for(url: &str, password: Option<&str>) -> Context {
        let config = Config {
            tracing: TracingConfig::default(),
            irc: IrcConfig::default(),
            yacy: YacyConfig {
                url: url.parse().unwrap(),
                username: "admin".to_string(),
                password: password.map(ToString::to_string),
            },
        };

        Context::new(config).unwrap()
    }

    /// Returns a client whose connection never leaves the process.
    pub(crate) async fn mock_client() -> Client {
        let config = irc::client::data::Config {
            nickname: Some("yabot".to_string()),
            server: Some("irc.example.org".to_string()),
            use_mock_connection: true,
            ..Default::default()
        };

        Client::from_config(config).await.unwrap()
    }

    pub(crate) fn message(raw: &str) -> Message {
        raw.parse().unwrap()
    }

    #[test]
    fn register_keeps_order_and_names() {
        let ctx = test_context();
        let mut registry = Registry::new();

        registry.register::<Noop>(&ctx).unwrap();

        assert_eq!(registry.plugins.len(), 1);
        assert_eq!(registry.plugins[0].name, Name::from("noop"));
        assert!(registry.contains("noop"));
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn register_propagates_constructor_errors() {
        let ctx = test_context();
        let mut registry = Registry::new();

        assert!(registry.register::<Broken>(&ctx).is_err());
        assert!(registry.plugins.is_empty());
    }

    #[cfg(feature = "plugin-yacy-status")]
    #[test]
    fn preloaded_registers_yacy_status() {
        let ctx = test_context();
        let registry = Registry::preloaded(&ctx).unwrap();

        assert!(registry.contains("yacy_status"));
    }
}
