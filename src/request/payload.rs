//! Request payload shapes.
//!
//! The recognized shapes form an explicit tagged union, classified once when
//! the payload is constructed and consumed exhaustively by the normalization
//! rewrites.

use serde_json::{Map, Value};

/// One value inside a form-like element or a form-data container.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        filename: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

impl FormValue {
    /// Content length in bytes, used for upload-progress accounting.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::File { bytes, .. } => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A captured form-like UI element: the named controls of one form, in
/// submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormElement {
    fields: Vec<(String, FormValue)>,
}

impl FormElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text control.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), FormValue::Text(value.into())));
        self
    }

    /// Adds a file control. The mime type is guessed from the filename at
    /// dispatch time unless set explicitly via [`FormElement::file_with_mime`].
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.fields.push((
            name.into(),
            FormValue::File {
                filename: filename.into(),
                mime: None,
                bytes,
            },
        ));
        self
    }

    pub fn file_with_mime(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.fields.push((
            name.into(),
            FormValue::File {
                filename: filename.into(),
                mime: Some(mime.into()),
                bytes,
            },
        ));
        self
    }

    pub fn fields(&self) -> &[(String, FormValue)] {
        &self.fields
    }
}

/// Form-data container: a transport-level payload able to carry file parts
/// next to plain text fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a container from a captured form element, preserving field
    /// order.
    pub fn from_element(element: &FormElement) -> Self {
        Self {
            entries: element.fields().to_vec(),
        }
    }

    /// Replaces all entries under `name` with a single text entry, appending
    /// if none existed. Matches `FormData.set` semantics.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.entries.retain(|(entry_name, _)| entry_name != name);
        self.entries
            .push((name.to_string(), FormValue::Text(value.into())));
    }

    /// Appends an entry without touching existing ones of the same name.
    pub fn append(&mut self, name: impl Into<String>, value: FormValue) {
        self.entries.push((name.into(), value));
    }

    /// Chainable text-entry helper.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, FormValue::Text(value.into()));
        self
    }

    /// Chainable file-entry helper.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.append(
            name,
            FormValue::File {
                filename: filename.into(),
                mime: None,
                bytes,
            },
        );
        self
    }

    /// First entry under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, value)| value)
    }

    pub fn entries(&self) -> &[(String, FormValue)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The recognized request payload shapes.
///
/// `Raw` is the pass-through bucket: values that match no recognized shape
/// are handed to the transport unchanged, which may itself reject them.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    #[default]
    Empty,
    /// A plain key/value mapping.
    Fields(Map<String, Value>),
    /// A single form-like UI element.
    Element(FormElement),
    /// A selection of form-like elements; a single-element selection is
    /// unwrapped during normalization.
    ElementSet(Vec<FormElement>),
    /// A form-data container.
    FormData(FormData),
    /// Any other JSON value, passed through unmodified.
    Raw(Value),
}

impl Payload {
    /// Emptiness in the sense the normalization guard cares about: no data,
    /// an empty mapping, or an empty selection.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Fields(map) => map.is_empty(),
            Self::ElementSet(set) => set.is_empty(),
            Self::Element(_) | Self::FormData(_) => false,
            Self::Raw(value) => value.is_null(),
        }
    }

    pub fn is_form_data(&self) -> bool {
        matches!(self, Self::FormData(_))
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self::Fields(map)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::Object(map) => Self::Fields(map),
            other => Self::Raw(other),
        }
    }
}

impl From<FormElement> for Payload {
    fn from(element: FormElement) -> Self {
        Self::Element(element)
    }
}

impl From<Vec<FormElement>> for Payload {
    fn from(elements: Vec<FormElement>) -> Self {
        Self::ElementSet(elements)
    }
}

impl From<FormData> for Payload {
    fn from(form: FormData) -> Self {
        Self::FormData(form)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}
