/// Configuration macros for zero-repetition config definitions
///
/// `config_struct!` defines a configuration section with embedded defaults in
/// a single declaration.

/// Define a configuration struct with embedded defaults
///
/// Each field is declared as `name: Type = default`. The macro generates:
/// - The struct with public fields
/// - The Default implementation
/// - Serde support with `#[serde(default)]`, so partial TOML files load
///
/// # Example
/// ```rust,ignore
/// config_struct! {
///     pub struct AuthConfig {
///         max_code_input_attempts: u32 = 3,
///         code_resend_delay_secs: u64 = 30,
///     }
/// }
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
