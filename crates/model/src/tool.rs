use std::collections::BTreeMap;

/// Describes a named parameter of a tool.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterProperty {
    /// JSON type of the parameter, e.g. `"string"` or `"number"`.
    pub r#type: String,
    /// Description of the parameter for the model.
    pub description: String,
}

/// The parameter schema of a tool.
///
/// Only flat objects are supported: a set of named properties and the
/// names of the required ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ToolParameters {
    /// Named properties of the argument object.
    pub properties: BTreeMap<String, ParameterProperty>,
    /// Names of the properties the model must supply.
    pub required: Vec<String>,
}

/// Describes a tool that can be used by the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolDefinition {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool.
    pub parameters: ToolParameters,
}

impl ToolDefinition {
    /// Creates a definition without parameters.
    #[inline]
    pub fn new<N: Into<String>, D: Into<String>>(name: N, description: D) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ToolParameters::default(),
        }
    }

    /// Adds a parameter to the definition.
    pub fn with_parameter<N, T, D>(
        mut self,
        name: N,
        r#type: T,
        description: D,
        required: bool,
    ) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        D: Into<String>,
    {
        let name = name.into();
        if required && !self.parameters.required.contains(&name) {
            self.parameters.required.push(name.clone());
        }
        self.parameters.properties.insert(
            name,
            ParameterProperty {
                r#type: r#type.into(),
                description: description.into(),
            },
        );
        self
    }
}
