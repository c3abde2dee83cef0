//! Procedural derive macros for inkseg.
//!
//! This crate provides the `ConfigValidator` derive used by the segmentation
//! configuration types.

use darling::{FromDeriveInput, FromField, FromMeta, ast};
use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, Expr, Type, parse_macro_input};

/// Parsed arguments for range validators: `range(min = .., max = ..)`
#[derive(Debug, FromMeta)]
struct RangeArgs {
    min: Expr,
    max: Expr,
}

/// All supported validators that can be applied to a field.
#[derive(Debug, Default, FromMeta)]
struct Validators {
    /// `#[validate(range(min = expr, max = expr))]` - value must be in [min, max]
    #[darling(default)]
    range: Option<RangeArgs>,

    /// `#[validate(min = expr)]` - value must be >= expr
    #[darling(default)]
    min: Option<Expr>,

    /// `#[validate(max = expr)]` - value must be <= expr
    #[darling(default)]
    max: Option<Expr>,

    /// `#[validate(nested)]` - field type implements `ConfigValidator` itself
    #[darling(default)]
    nested: bool,
}

/// A single field with its validation rules.
#[derive(Debug, FromField)]
#[darling(attributes(validate))]
struct ValidatedField {
    ident: Option<syn::Ident>,
    #[allow(dead_code)]
    ty: Type,
    #[darling(flatten)]
    validators: Validators,
}

/// The input struct for ConfigValidator derive.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(validate), supports(struct_named))]
struct ConfigValidatorInput {
    ident: syn::Ident,
    data: ast::Data<(), ValidatedField>,
    /// `#[validate(custom = "path::to::fn")]` - struct-level check run after the field rules.
    #[darling(default)]
    custom: Option<syn::Path>,
}

/// Derive macro for implementing the `ConfigValidator` trait.
///
/// Validation rules are specified using the `#[validate(...)]` attribute on
/// fields. A struct-level `#[validate(custom = "fn_name")]` names a function
/// `fn(&Self) -> Result<(), ConfigError>` for cross-field rules; it runs after
/// every field rule has passed.
///
/// # Supported Validators
///
/// - `#[validate(range(min = value, max = value))]` - the field value is within [min, max]
/// - `#[validate(min = value)]` - the field value is at least `value`
/// - `#[validate(max = value)]` - the field value is at most `value`
/// - `#[validate(nested)]` - delegates to the field's own `ConfigValidator` impl
///
/// # Example
///
/// ```rust,ignore
/// use inkseg_derive::ConfigValidator;
///
/// #[derive(ConfigValidator, Default)]
/// #[validate(custom = "check_thresholds")]
/// pub struct EdgeConfig {
///     #[validate(range(min = 0.0, max = 1140.0))]
///     pub low: f32,
///
///     #[validate(range(min = 0.0, max = 1140.0))]
///     pub high: f32,
///
///     #[validate(nested)]
///     pub kernel: KernelSize,
/// }
/// ```
#[proc_macro_derive(ConfigValidator, attributes(validate))]
pub fn derive_config_validator(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    ConfigValidatorInput::from_derive_input(&input)
        .and_then(|parsed| generate_config_validator(&parsed))
        .unwrap_or_else(|err| err.write_errors())
        .into()
}

fn generate_config_validator(
    input: &ConfigValidatorInput,
) -> darling::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = input
        .data
        .as_ref()
        .take_struct()
        .ok_or_else(|| darling::Error::custom("ConfigValidator only supports structs"))?;

    let validations: Vec<_> = fields
        .iter()
        .filter_map(|field| generate_field_validation(field))
        .collect();

    let custom = input.custom.as_ref().map(|path| {
        quote! {
            #path(self)?;
        }
    });

    Ok(quote! {
        impl crate::core::config::ConfigValidator for #name {
            fn validate(&self) -> Result<(), crate::core::config::ConfigError> {
                #(#validations)*
                #custom
                Ok(())
            }

            fn get_defaults() -> Self
            where
                Self: Sized,
            {
                Self::default()
            }
        }
    })
}

fn generate_field_validation(field: &ValidatedField) -> Option<proc_macro2::TokenStream> {
    let field_name = field.ident.as_ref()?;
    let field_name_str = field_name.to_string();
    let validators = &field.validators;

    let mut validations = Vec::new();

    if let Some(range) = &validators.range {
        let min_expr = &range.min;
        let max_expr = &range.max;
        validations.push(quote! {
            if !(#min_expr..=#max_expr).contains(&self.#field_name) {
                return Err(crate::core::config::ConfigError::InvalidConfig {
                    message: format!(
                        "{} must be between {} and {}",
                        #field_name_str,
                        #min_expr,
                        #max_expr
                    ),
                });
            }
        });
    }

    if let Some(min_expr) = &validators.min {
        validations.push(quote! {
            if self.#field_name < #min_expr {
                return Err(crate::core::config::ConfigError::InvalidConfig {
                    message: format!("{} must be at least {}", #field_name_str, #min_expr),
                });
            }
        });
    }

    if let Some(max_expr) = &validators.max {
        validations.push(quote! {
            if self.#field_name > #max_expr {
                return Err(crate::core::config::ConfigError::InvalidConfig {
                    message: format!("{} must be at most {}", #field_name_str, #max_expr),
                });
            }
        });
    }

    if validators.nested {
        validations.push(quote! {
            crate::core::config::ConfigValidator::validate(&self.#field_name).map_err(|err| {
                crate::core::config::ConfigError::InvalidConfig {
                    message: format!("{}: {}", #field_name_str, err),
                }
            })?;
        });
    }

    if validations.is_empty() {
        None
    } else {
        Some(quote! { #(#validations)* })
    }
}
