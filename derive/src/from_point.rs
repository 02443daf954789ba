use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, GenericArgument, Ident, PathArguments,
    Result, Token, Type,
    parse::{Parse, ParseStream},
};

pub(crate) fn expand_from_point(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new_spanned(
            input,
            "`FromPoint` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new_spanned(
            input,
            "`FromPoint` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let mut variants = HashSet::new();
    for field in &fields {
        if !variants.insert(field.variant.to_string()) {
            Err(Error::new_spanned(
                &field.variant,
                "Each `Value` variant may only be received by one field.",
            ))?
        }
    }

    let cases = fields.iter().map(|field| {
        let FieldMetadata {
            name,
            variant,
            handler,
        } = field;

        let assignment = if let Some((field_type, handler)) = handler {
            let body = &handler.body;
            let acc = &handler.inputs[0];
            let val = &handler.inputs[1];

            quote! {
                (|#acc: &mut #field_type, #val| { #body })(&mut self.#name, value)
            }
        } else {
            quote! {
                self.#name = Some(value)
            }
        };

        quote! {
            ::mtklog::sans::data::Value::#variant(value) => { #assignment; }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl ::mtklog::avec::FromPoint for #name {
            #[allow(unreachable_patterns)]
            fn add_value(&mut self, value: ::mtklog::sans::data::Value) {
                match value {
                    #(#cases)*
                    _ => {}
                }
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    variant: Ident,
    handler: Option<(Type, ExprClosure)>,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let name = field.ident.clone().unwrap();

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("field")) else {
            return Ok(None);
        };

        let FieldAttribute { variant, handler } = attr.meta.require_list()?.parse_args()?;

        if let Some(handler) = &handler {
            if handler.inputs.len() != 2 {
                Err(Error::new_spanned(
                    handler,
                    "Accumulator closure must take the field and the value.",
                ))?
            }
        } else {
            require_option(&field.ty)?;
        }

        let handler = handler.map(|h| (field.ty.clone(), h));

        Ok(Some(Self {
            name,
            variant,
            handler,
        }))
    }
}

/// Check that a field without a handler has type `Option<T>`.
fn require_option(ty: &Type) -> Result<()> {
    let Type::Path(path) = ty else {
        Err(Error::new_spanned(ty, "Field must have a type annotation."))?
    };

    let Some(segment) = path.path.segments.last() else {
        Err(Error::new_spanned(
            &path.path.segments,
            "Field must have a type annotation.",
        ))?
    };

    if segment.ident != "Option" {
        Err(Error::new_spanned(
            &segment.ident,
            "Field without an accumulator must have type `Option<T>`.",
        ))?
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        Err(Error::new_spanned(
            &segment.arguments,
            "Field of type `Option<T>` must have a generic parameter.",
        ))?
    };

    let Some(GenericArgument::Type(_)) = arguments.args.first() else {
        Err(Error::new_spanned(
            &arguments.args,
            "Generic argument of a field of type `Option<T>` must be a type.",
        ))?
    };

    Ok(())
}

#[derive(Debug)]
struct FieldAttribute {
    variant: Ident,
    handler: Option<ExprClosure>,
}

impl Parse for FieldAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let variant = input.parse::<Ident>()?;

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self { variant, handler })
    }
}
