//! Interaction event and response types.
//!
//! Discord tags both inbound events and outbound responses with a numeric
//! `type` field. These types lift that tag into enum variants so a payload is
//! only reachable under the tag it belongs to.
//!
//! ## Wire Shapes
//!
//! ```text
//! {"type":1}                                  → InteractionEvent::Ping
//! {"type":2,"data":{"name":"foo"}}            → InteractionEvent::ApplicationCommand
//! InteractionResponse::Pong                   → {"type":1}
//! ChannelMessageWithSource(content = "bar")   → {"type":4,"data":{"content":"bar"}}
//! ```

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::DecodeError;

/// Message flag that makes a reply visible only to the invoking user.
pub const EPHEMERAL: u64 = 1 << 6;

const ACTION_ROW_COMPONENT: u8 = 1;
const BUTTON_COMPONENT: u8 = 2;
const STRING_SELECT_COMPONENT: u8 = 3;
const TEXT_INPUT_COMPONENT: u8 = 4;

// =============================================================================
// Inbound Events
// =============================================================================

/// Kind of an inbound interaction event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    MessageComponent,
    ApplicationCommandAutocomplete,
    ModalSubmit,
}

impl InteractionType {
    /// Map a wire `type` code to a kind.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Ping),
            2 => Some(Self::ApplicationCommand),
            3 => Some(Self::MessageComponent),
            4 => Some(Self::ApplicationCommandAutocomplete),
            5 => Some(Self::ModalSubmit),
            _ => None,
        }
    }

    /// Wire `type` code for this kind.
    pub fn code(self) -> u8 {
        match self {
            Self::Ping => 1,
            Self::ApplicationCommand => 2,
            Self::MessageComponent => 3,
            Self::ApplicationCommandAutocomplete => 4,
            Self::ModalSubmit => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::ApplicationCommand => "application_command",
            Self::MessageComponent => "message_component",
            Self::ApplicationCommandAutocomplete => "application_command_autocomplete",
            Self::ModalSubmit => "modal_submit",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded interaction: envelope metadata plus the typed event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawInteraction")]
pub struct Interaction {
    pub id: Option<String>,
    pub application_id: Option<String>,
    pub token: Option<String>,
    pub guild_id: Option<String>,
    pub channel_id: Option<String>,
    pub version: Option<u8>,
    pub event: InteractionEvent,
}

impl Interaction {
    /// Decode an interaction from the raw request body.
    ///
    /// Shape errors in `data` surface as typed [`DecodeError`] variants
    /// rather than as opaque JSON errors.
    pub fn from_slice(body: &[u8]) -> Result<Self, DecodeError> {
        let raw: RawInteraction = serde_json::from_slice(body)?;
        Interaction::try_from(raw)
    }
}

/// Interaction event, discriminated by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    Ping,
    ApplicationCommand(CommandData),
    MessageComponent(ComponentData),
    ApplicationCommandAutocomplete(CommandData),
    ModalSubmit(ModalSubmitData),
}

impl InteractionEvent {
    pub fn kind(&self) -> InteractionType {
        match self {
            Self::Ping => InteractionType::Ping,
            Self::ApplicationCommand(_) => InteractionType::ApplicationCommand,
            Self::MessageComponent(_) => InteractionType::MessageComponent,
            Self::ApplicationCommandAutocomplete(_) => {
                InteractionType::ApplicationCommandAutocomplete
            }
            Self::ModalSubmit(_) => InteractionType::ModalSubmit,
        }
    }
}

/// Untyped interaction as it appears on the wire.
///
/// `data` stays a raw value until the `type` tag says which shape to expect.
#[derive(Debug, Deserialize)]
struct RawInteraction {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    application_id: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    guild_id: Option<String>,
    #[serde(default)]
    channel_id: Option<String>,
    #[serde(default)]
    version: Option<u8>,
}

impl TryFrom<RawInteraction> for Interaction {
    type Error = DecodeError;

    fn try_from(raw: RawInteraction) -> Result<Self, Self::Error> {
        let kind =
            InteractionType::from_code(raw.kind).ok_or(DecodeError::UnknownType(raw.kind))?;

        let event = match kind {
            InteractionType::Ping => InteractionEvent::Ping,
            InteractionType::ApplicationCommand => {
                InteractionEvent::ApplicationCommand(decode_data(kind, raw.data)?)
            }
            InteractionType::MessageComponent => {
                InteractionEvent::MessageComponent(decode_data(kind, raw.data)?)
            }
            InteractionType::ApplicationCommandAutocomplete => {
                InteractionEvent::ApplicationCommandAutocomplete(decode_data(kind, raw.data)?)
            }
            InteractionType::ModalSubmit => {
                InteractionEvent::ModalSubmit(decode_data(kind, raw.data)?)
            }
        };

        Ok(Interaction {
            id: raw.id,
            application_id: raw.application_id,
            token: raw.token,
            guild_id: raw.guild_id,
            channel_id: raw.channel_id,
            version: raw.version,
            event,
        })
    }
}

fn decode_data<T>(
    kind: InteractionType,
    data: Option<serde_json::Value>,
) -> Result<T, DecodeError>
where
    T: for<'de> Deserialize<'de>,
{
    let data = data.ok_or(DecodeError::MissingData(kind))?;
    serde_json::from_value(data).map_err(|source| DecodeError::InvalidData { kind, source })
}

/// Payload of an application command or autocomplete interaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandData {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, rename = "type")]
    pub command_type: Option<u8>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandData {
    /// Top-level option by name.
    pub fn option(&self, name: &str) -> Option<&CommandOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// The option currently being typed in an autocomplete interaction,
    /// searched through subcommand nesting.
    pub fn focused_option(&self) -> Option<&CommandOption> {
        fn find(options: &[CommandOption]) -> Option<&CommandOption> {
            options
                .iter()
                .find_map(|o| if o.focused { Some(o) } else { find(&o.options) })
        }
        find(&self.options)
    }
}

/// A single command argument, or a subcommand carrying nested options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default, rename = "type")]
    pub option_type: u8,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    #[serde(default)]
    pub focused: bool,
}

impl CommandOption {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(|v| v.as_str())
    }
}

/// Payload of a button click or select menu interaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentData {
    pub custom_id: String,
    pub component_type: u8,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Payload of a submitted modal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModalSubmitData {
    pub custom_id: String,
    #[serde(default)]
    pub components: Vec<SubmittedRow>,
}

impl ModalSubmitData {
    /// Submitted value of the text input with the given `custom_id`.
    pub fn value(&self, custom_id: &str) -> Option<&str> {
        self.components
            .iter()
            .flat_map(|row| row.components.iter())
            .find(|field| field.custom_id == custom_id)
            .and_then(|field| field.value.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmittedRow {
    #[serde(default)]
    pub components: Vec<SubmittedField>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmittedField {
    pub custom_id: String,
    #[serde(default)]
    pub value: Option<String>,
}

// =============================================================================
// Outbound Responses
// =============================================================================

/// Response type code sent back to Discord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InteractionResponseType {
    Pong = 1,
    ChannelMessageWithSource = 4,
    DeferredChannelMessageWithSource = 5,
    DeferredMessageUpdate = 6,
    UpdateMessage = 7,
    AutocompleteResult = 8,
    Modal = 9,
}

impl InteractionResponseType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Response to an interaction.
///
/// Each variant carries only the fields Discord accepts for its type.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionResponse {
    Pong,
    ChannelMessageWithSource(MessageData),
    DeferredChannelMessageWithSource { flags: Option<u64> },
    DeferredMessageUpdate,
    UpdateMessage(MessageData),
    AutocompleteResult(Vec<CommandChoice>),
    Modal(ModalData),
}

impl InteractionResponse {
    pub fn response_type(&self) -> InteractionResponseType {
        match self {
            Self::Pong => InteractionResponseType::Pong,
            Self::ChannelMessageWithSource(_) => InteractionResponseType::ChannelMessageWithSource,
            Self::DeferredChannelMessageWithSource { .. } => {
                InteractionResponseType::DeferredChannelMessageWithSource
            }
            Self::DeferredMessageUpdate => InteractionResponseType::DeferredMessageUpdate,
            Self::UpdateMessage(_) => InteractionResponseType::UpdateMessage,
            Self::AutocompleteResult(_) => InteractionResponseType::AutocompleteResult,
            Self::Modal(_) => InteractionResponseType::Modal,
        }
    }
}

#[derive(Serialize)]
struct ResponseEnvelope<'a> {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ResponseData<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ResponseData<'a> {
    Message(&'a MessageData),
    Deferred { flags: u64 },
    Autocomplete { choices: &'a [CommandChoice] },
    Modal(&'a ModalData),
}

impl Serialize for InteractionResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let data = match self {
            Self::Pong | Self::DeferredMessageUpdate => None,
            Self::ChannelMessageWithSource(message) | Self::UpdateMessage(message) => {
                Some(ResponseData::Message(message))
            }
            Self::DeferredChannelMessageWithSource { flags } => {
                flags.map(|flags| ResponseData::Deferred { flags })
            }
            Self::AutocompleteResult(choices) => Some(ResponseData::Autocomplete { choices }),
            Self::Modal(modal) => Some(ResponseData::Modal(modal)),
        };

        ResponseEnvelope {
            kind: self.response_type().code(),
            data,
        }
        .serialize(serializer)
    }
}

/// Message body for message-carrying responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ActionRow>,
}

impl MessageData {
    /// Plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Mark the message as visible only to the invoking user.
    pub fn ephemeral(mut self) -> Self {
        self.flags = Some(self.flags.unwrap_or(0) | EPHEMERAL);
        self
    }

    /// Attach a row of buttons or a select menu.
    pub fn with_row(mut self, row: ActionRow) -> Self {
        self.components.push(row);
        self
    }
}

/// A single autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandChoice {
    pub name: String,
    pub value: serde_json::Value,
}

impl CommandChoice {
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Modal popup shown in response to an interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalData {
    pub custom_id: String,
    pub title: String,
    pub components: Vec<ActionRow>,
}

impl ModalData {
    pub fn new(custom_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            title: title.into(),
            components: Vec::new(),
        }
    }

    /// Append a text input on its own row.
    pub fn with_input(mut self, input: TextInput) -> Self {
        self.components.push(ActionRow::new(vec![input.into()]));
        self
    }
}

/// Row of interactive components in a message or modal.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRow {
    pub components: Vec<Component>,
}

impl ActionRow {
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }
}

impl Serialize for ActionRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("ActionRow", 2)?;
        row.serialize_field("type", &ACTION_ROW_COMPONENT)?;
        row.serialize_field("components", &self.components)?;
        row.end()
    }
}

/// Component that can sit inside an [`ActionRow`].
///
/// Each variant writes its own `type` code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Component {
    Button(Button),
    SelectMenu(SelectMenu),
    TextInput(TextInput),
}

impl From<Button> for Component {
    fn from(button: Button) -> Self {
        Self::Button(button)
    }
}

impl From<SelectMenu> for Component {
    fn from(menu: SelectMenu) -> Self {
        Self::SelectMenu(menu)
    }
}

impl From<TextInput> for Component {
    fn from(input: TextInput) -> Self {
        Self::TextInput(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
    Link,
}

impl Serialize for ButtonStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::Primary => 1,
            Self::Secondary => 2,
            Self::Success => 3,
            Self::Danger => 4,
            Self::Link => 5,
        })
    }
}

/// Clickable button. Link buttons carry a `url` instead of a `custom_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    kind: u8,
    pub style: ButtonStyle,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl Button {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            kind: BUTTON_COMPONENT,
            style,
            label: label.into(),
            custom_id: Some(custom_id.into()),
            url: None,
            disabled: None,
        }
    }

    pub fn link(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: BUTTON_COMPONENT,
            style: ButtonStyle::Link,
            label: label.into(),
            custom_id: None,
            url: Some(url.into()),
            disabled: None,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }
}

/// Drop-down of string options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectMenu {
    #[serde(rename = "type")]
    kind: u8,
    pub custom_id: String,
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_values: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_values: Option<u8>,
}

impl SelectMenu {
    pub fn new(custom_id: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            kind: STRING_SELECT_COMPONENT,
            custom_id: custom_id.into(),
            options,
            placeholder: None,
            min_values: None,
            max_values: None,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputStyle {
    Short,
    Paragraph,
}

impl Serialize for TextInputStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::Short => 1,
            Self::Paragraph => 2,
        })
    }
}

/// Text input field inside a modal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextInput {
    #[serde(rename = "type")]
    kind: u8,
    pub custom_id: String,
    pub style: TextInputStyle,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TextInput {
    pub fn new(
        custom_id: impl Into<String>,
        label: impl Into<String>,
        style: TextInputStyle,
    ) -> Self {
        Self {
            kind: TEXT_INPUT_COMPONENT,
            custom_id: custom_id.into(),
            style,
            label: label.into(),
            placeholder: None,
            required: None,
            value: None,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }
}
