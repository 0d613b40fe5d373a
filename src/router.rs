//! Command routing.
//!
//! A [`CommandTable`] maps command names received by the transport layer to
//! handlers operating on a shared context (normally the
//! [`Tannenbaum`](crate::device::Tannenbaum) device). The table is built
//! once at startup; the router itself keeps no other state.

use core::fmt;
use heapless::index_map::FnvIndexMap;

/// Action bound to a command name.
pub enum Handler<C> {
    /// Runs without an argument; any received value is ignored.
    Trigger(fn(&mut C)),
    /// Takes an integer argument. Unparsable values are passed as `0`.
    Integer(fn(&mut C, i32)),
}

impl<C> Clone for Handler<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Handler<C> {}

impl<C> fmt::Debug for Handler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Trigger(_) => f.write_str("Trigger"),
            Handler::Integer(_) => f.write_str("Integer"),
        }
    }
}

impl<C> Handler<C> {
    fn invoke(self, context: &mut C, value: &str) {
        match self {
            Handler::Trigger(action) => action(context),
            Handler::Integer(action) => action(context, parse_int(value)),
        }
    }
}

/// Parses a decimal integer argument, falling back to `0`.
pub fn parse_int(value: &str) -> i32 {
    value.trim().parse().unwrap_or(0)
}

/// Errors that can occur while registering or dispatching commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RouterError {
    /// No handler is registered under the name.
    UnknownCommand,
    /// The table has no room for another command.
    TableFull,
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::UnknownCommand => write!(f, "command not registered"),
            RouterError::TableFull => write!(f, "command table is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RouterError {}

/// Maps command names to handlers.
///
/// # Type Parameters
/// * `C` - Context type the handlers operate on
/// * `N` - Table capacity, must be a power of two
pub struct CommandTable<C, const N: usize> {
    handlers: FnvIndexMap<&'static str, Handler<C>, N>,
}

impl<C, const N: usize> CommandTable<C, N> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            handlers: FnvIndexMap::new(),
        }
    }

    /// Binds `handler` to `name`, replacing an earlier binding.
    ///
    /// # Errors
    /// * `TableFull` - `name` is new and the table is at capacity
    pub fn register(&mut self, name: &'static str, handler: Handler<C>) -> Result<(), RouterError> {
        self.handlers
            .insert(name, handler)
            .map_err(|_| RouterError::TableFull)?;
        debug!("registered command {}", name);
        Ok(())
    }

    /// Binds a command without argument.
    pub fn register_trigger(&mut self, name: &'static str, action: fn(&mut C)) -> Result<(), RouterError> {
        self.register(name, Handler::Trigger(action))
    }

    /// Binds a command with an integer argument.
    pub fn register_integer(
        &mut self,
        name: &'static str,
        action: fn(&mut C, i32),
    ) -> Result<(), RouterError> {
        self.register(name, Handler::Integer(action))
    }

    /// Runs the handler bound to `name`.
    ///
    /// # Errors
    /// * `UnknownCommand` - nothing is registered under `name`; the context
    ///   is left untouched
    pub fn dispatch(&self, context: &mut C, name: &str, value: &str) -> Result<(), RouterError> {
        let handler = *self
            .handlers
            .get(name)
            .ok_or(RouterError::UnknownCommand)?;
        trace!("dispatch {}={}", name, value);
        handler.invoke(context, value);
        Ok(())
    }

    /// Dispatches every `(name, value)` parameter of a request in order.
    ///
    /// Unknown names are logged and skipped. Returns how many were skipped.
    pub fn dispatch_all<'a, I>(&self, context: &mut C, params: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut unrecognized = 0;
        for (name, value) in params {
            if self.dispatch(context, name, value).is_err() {
                warn!("not registered in command mapping: {}", name);
                unrecognized += 1;
            }
        }
        unrecognized
    }

    /// Returns true if a handler is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered command names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<C, const N: usize> Default for CommandTable<C, N> {
    fn default() -> Self {
        Self::new()
    }
}
