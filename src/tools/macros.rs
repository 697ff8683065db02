//! Schema Definition Macro
//!
//! Declarative construction of argument schemas, so tool modules read as
//! data rather than `FieldSpec` plumbing.

/// Build a `Vec<FieldSpec>` from a declarative field list
///
/// # Example
/// ```
/// use deskpilot::schema;
///
/// let fields = schema![
///     {
///         name: "file_path",
///         type: String,
///         description: "The file path to read",
///         required: true
///     },
///     {
///         name: "append",
///         type: Bool,
///         description: "Append instead of overwrite",
///         required: false,
///         default: false
///     },
/// ];
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! schema {
    (
        $(
            {
                name: $name:expr,
                type: $ty:ident,
                description: $desc:expr,
                required: $required:expr
                $(, default: $default:expr)?
                $(,)?
            }
        ),* $(,)?
    ) => {
        vec![
            $(
                {
                    #[allow(unused_mut)]
                    let mut field = $crate::tools::FieldSpec {
                        name: $name.to_string(),
                        ty: $crate::tools::ArgType::$ty,
                        description: $desc.to_string(),
                        required: $required,
                        default: None,
                    };
                    $( field.default = Some($crate::tools::ArgValue::from($default)); )?
                    field
                }
            ),*
        ]
    };
}

#[cfg(test)]
mod tests {
    use crate::tools::{ArgType, ArgValue};

    #[test]
    fn test_schema_macro() {
        let fields = schema![
            {
                name: "url",
                type: String,
                description: "The URL to request",
                required: true
            },
            {
                name: "timeout_seconds",
                type: Int,
                description: "Request timeout",
                required: false,
                default: 30i64
            },
        ];

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "url");
        assert_eq!(fields[0].ty, ArgType::String);
        assert!(fields[0].required);
        assert_eq!(fields[0].default, None);

        assert_eq!(fields[1].ty, ArgType::Int);
        assert!(!fields[1].required);
        assert_eq!(fields[1].default, Some(ArgValue::Int(30)));
    }

    #[test]
    fn test_schema_macro_empty() {
        let fields: Vec<crate::tools::FieldSpec> = schema![];
        assert!(fields.is_empty());
    }
}
