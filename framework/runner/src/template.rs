use crate::context::VuContext;
use bytes::Bytes;
use seq_load_core::prelude::ConfigurationError;
use serde_json::Value;

/// A value substituted into a request body for each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// Offset of the page this iteration reads, cycling through `total_pages` pages of
    /// `page_size` documents.
    PageOffset { page_size: u64, total_pages: u64 },
}

impl Parameter {
    pub fn resolve(&self, vu: &VuContext) -> Value {
        match self {
            Parameter::PageOffset {
                page_size,
                total_pages,
            } => Value::from(page_offset(vu.iteration_index(), *page_size, *total_pages)),
        }
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            Parameter::PageOffset {
                page_size,
                total_pages,
            } if *page_size == 0
                || *total_pages == 0
                // The offset of the last page must fit in a u64.
                || page_size.checked_mul(*total_pages - 1).is_none() =>
            {
                Err(ConfigurationError::InvalidPagination {
                    page_size: *page_size,
                    total_pages: *total_pages,
                })
            }
            Parameter::PageOffset { .. } => Ok(()),
        }
    }
}

/// `(iteration_index mod total_pages) * page_size`
///
/// Panics on overflow or when `total_pages` is zero, templates reject such pagination up front.
pub fn page_offset(iteration_index: u64, page_size: u64, total_pages: u64) -> u64 {
    (iteration_index % total_pages) * page_size
}

/// A JSON request body with optional per-iteration substitutions.
///
/// Substitutions are addressed by JSON pointer, for example `/offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyTemplate {
    document: Value,
    bindings: Vec<(String, Parameter)>,
}

impl BodyTemplate {
    /// A body that is sent unchanged on every iteration.
    pub fn fixed(document: Value) -> Self {
        Self {
            document,
            bindings: Vec::new(),
        }
    }

    /// Replace the field at `pointer` with `parameter` on every iteration. The field must exist in
    /// the document, its value is only a placeholder.
    pub fn with_parameter(mut self, pointer: &str, parameter: Parameter) -> Self {
        self.bindings.push((pointer.to_string(), parameter));
        self
    }

    pub fn is_static(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        for (pointer, parameter) in &self.bindings {
            if self.document.pointer(pointer).is_none() {
                return Err(ConfigurationError::UnknownTemplateField(pointer.clone()));
            }
            parameter.validate()?;
        }

        Ok(())
    }

    pub fn render(&self, vu: &VuContext) -> Value {
        let mut document = self.document.clone();
        for (pointer, parameter) in &self.bindings {
            if let Some(field) = document.pointer_mut(pointer) {
                *field = parameter.resolve(vu);
            }
        }
        document
    }
}

/// A template prepared for sending. Static bodies are serialized once and shared by every request.
#[derive(Debug, Clone)]
pub(crate) enum PreparedBody {
    Static(Bytes),
    Templated(BodyTemplate),
}

impl PreparedBody {
    pub(crate) fn prepare(template: BodyTemplate) -> Result<Self, ConfigurationError> {
        template.validate()?;

        if template.is_static() {
            Ok(PreparedBody::Static(Bytes::from(template.document.to_string())))
        } else {
            Ok(PreparedBody::Templated(template))
        }
    }

    pub(crate) fn for_iteration(&self, vu: &VuContext) -> Bytes {
        match self {
            PreparedBody::Static(body) => body.clone(),
            PreparedBody::Templated(template) => Bytes::from(template.render(vu).to_string()),
        }
    }
}
