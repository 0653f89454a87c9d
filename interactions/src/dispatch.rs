//! Interaction dispatch.
//!
//! Maps a verified interaction event to the response Discord expects:
//!
//! ```text
//! Ping                 → Pong
//! ApplicationCommand   → ChannelMessageWithSource (registered handler or fallback text)
//! MessageComponent     → ComponentHandler, if registered
//! Autocomplete         → AutocompleteHandler, if registered
//! ModalSubmit          → ModalSubmitHandler, if registered
//! ```
//!
//! A kind without a handler is reported as [`DispatchError::UnsupportedKind`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::DispatchError;
use crate::interaction::{
    CommandChoice, CommandData, CommandOption, ComponentData, InteractionEvent, InteractionResponse,
    MessageData, ModalData, ModalSubmitData,
};

/// Reply for commands with no registered handler.
pub const UNKNOWN_COMMAND_MESSAGE: &str = "Sorry, I don't recognize that command.";

/// Produces the message for an application command.
pub trait CommandHandler: Send + Sync {
    fn execute(&self, command: &CommandData) -> MessageData;
}

impl<F> CommandHandler for F
where
    F: Fn(&CommandData) -> MessageData + Send + Sync,
{
    fn execute(&self, command: &CommandData) -> MessageData {
        self(command)
    }
}

/// Responses a message component interaction may produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentResponse {
    ChannelMessage(MessageData),
    DeferredUpdate,
    UpdateMessage(MessageData),
    Modal(ModalData),
}

impl From<ComponentResponse> for InteractionResponse {
    fn from(response: ComponentResponse) -> Self {
        match response {
            ComponentResponse::ChannelMessage(message) => Self::ChannelMessageWithSource(message),
            ComponentResponse::DeferredUpdate => Self::DeferredMessageUpdate,
            ComponentResponse::UpdateMessage(message) => Self::UpdateMessage(message),
            ComponentResponse::Modal(modal) => Self::Modal(modal),
        }
    }
}

pub trait ComponentHandler: Send + Sync {
    fn handle_component(&self, component: &ComponentData) -> ComponentResponse;
}

impl<F> ComponentHandler for F
where
    F: Fn(&ComponentData) -> ComponentResponse + Send + Sync,
{
    fn handle_component(&self, component: &ComponentData) -> ComponentResponse {
        self(component)
    }
}

/// Suggests choices for the focused option of a command.
pub trait AutocompleteHandler: Send + Sync {
    fn suggest(&self, command: &CommandData) -> Vec<CommandChoice>;
}

impl<F> AutocompleteHandler for F
where
    F: Fn(&CommandData) -> Vec<CommandChoice> + Send + Sync,
{
    fn suggest(&self, command: &CommandData) -> Vec<CommandChoice> {
        self(command)
    }
}

/// Responses a modal submission may produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalSubmitResponse {
    ChannelMessage(MessageData),
    DeferredChannelMessage { flags: Option<u64> },
    UpdateMessage(MessageData),
}

impl From<ModalSubmitResponse> for InteractionResponse {
    fn from(response: ModalSubmitResponse) -> Self {
        match response {
            ModalSubmitResponse::ChannelMessage(message) => Self::ChannelMessageWithSource(message),
            ModalSubmitResponse::DeferredChannelMessage { flags } => {
                Self::DeferredChannelMessageWithSource { flags }
            }
            ModalSubmitResponse::UpdateMessage(message) => Self::UpdateMessage(message),
        }
    }
}

pub trait ModalSubmitHandler: Send + Sync {
    fn handle_submission(&self, submission: &ModalSubmitData) -> ModalSubmitResponse;
}

impl<F> ModalSubmitHandler for F
where
    F: Fn(&ModalSubmitData) -> ModalSubmitResponse + Send + Sync,
{
    fn handle_submission(&self, submission: &ModalSubmitData) -> ModalSubmitResponse {
        self(submission)
    }
}

/// Routes interaction events to responses.
///
/// Stateless between calls; handlers are registered up front and shared
/// read-only across requests.
#[derive(Clone, Default)]
pub struct InteractionDispatcher {
    commands: HashMap<String, Arc<dyn CommandHandler>>,
    components: Option<Arc<dyn ComponentHandler>>,
    autocomplete: Option<Arc<dyn AutocompleteHandler>>,
    modal_submit: Option<Arc<dyn ModalSubmitHandler>>,
}

impl InteractionDispatcher {
    /// Dispatcher with no commands and no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with the built-in `foo` and `echo` commands.
    pub fn with_builtin_commands() -> Self {
        Self::new()
            .with_command("foo", foo_command)
            .with_command("echo", echo_command)
    }

    pub fn with_command(
        mut self,
        name: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        self.commands.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn with_component_handler(mut self, handler: impl ComponentHandler + 'static) -> Self {
        self.components = Some(Arc::new(handler));
        self
    }

    pub fn with_autocomplete_handler(
        mut self,
        handler: impl AutocompleteHandler + 'static,
    ) -> Self {
        self.autocomplete = Some(Arc::new(handler));
        self
    }

    pub fn with_modal_submit_handler(
        mut self,
        handler: impl ModalSubmitHandler + 'static,
    ) -> Self {
        self.modal_submit = Some(Arc::new(handler));
        self
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Map an event to its response.
    ///
    /// Unknown command names are answered with [`UNKNOWN_COMMAND_MESSAGE`],
    /// not an error.
    pub fn dispatch(&self, event: &InteractionEvent) -> Result<InteractionResponse, DispatchError> {
        let kind = event.kind();
        debug!(kind = %kind, "interaction_dispatch_start");

        let response = match event {
            InteractionEvent::Ping => InteractionResponse::Pong,
            InteractionEvent::ApplicationCommand(command) => {
                InteractionResponse::ChannelMessageWithSource(self.run_command(command))
            }
            InteractionEvent::MessageComponent(component) => self
                .components
                .as_ref()
                .map(|h| InteractionResponse::from(h.handle_component(component)))
                .ok_or(DispatchError::UnsupportedKind(kind))?,
            InteractionEvent::ApplicationCommandAutocomplete(command) => self
                .autocomplete
                .as_ref()
                .map(|h| InteractionResponse::AutocompleteResult(h.suggest(command)))
                .ok_or(DispatchError::UnsupportedKind(kind))?,
            InteractionEvent::ModalSubmit(submission) => self
                .modal_submit
                .as_ref()
                .map(|h| InteractionResponse::from(h.handle_submission(submission)))
                .ok_or(DispatchError::UnsupportedKind(kind))?,
        };

        Ok(response)
    }

    fn run_command(&self, command: &CommandData) -> MessageData {
        match self.commands.get(&command.name) {
            Some(handler) => {
                info!(command = %command.name, "command_matched");
                handler.execute(command)
            }
            None => {
                warn!(command = %command.name, "command_unrecognized");
                MessageData::text(UNKNOWN_COMMAND_MESSAGE)
            }
        }
    }
}

impl fmt::Debug for InteractionDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        commands.sort_unstable();
        f.debug_struct("InteractionDispatcher")
            .field("commands", &commands)
            .field("components", &self.components.is_some())
            .field("autocomplete", &self.autocomplete.is_some())
            .field("modal_submit", &self.modal_submit.is_some())
            .finish()
    }
}

fn foo_command(_: &CommandData) -> MessageData {
    MessageData::text("bar")
}

fn echo_command(command: &CommandData) -> MessageData {
    match command.option("message").and_then(CommandOption::as_str) {
        Some(text) => MessageData::text(text),
        None => MessageData::text("Usage: /echo message:<text>").ephemeral(),
    }
}
