use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Ident, Result, Type,
    parse::{Parse, ParseStream},
};

pub(crate) fn expand_from_sector(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new_spanned(
            input,
            "`FromSector` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new_spanned(
            input,
            "`FromSector` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let mut header = None;
    let mut setting = None;
    let mut point = None;

    for field in fields {
        let slot = match field.role {
            Role::Header => &mut header,
            Role::Setting => &mut setting,
            Role::Point => &mut point,
        };

        if slot.is_some() {
            Err(Error::new_spanned(
                &field.name,
                "Each sector role may only be received by one field.",
            ))?
        }

        *slot = Some(field);
    }

    let header_method = header.map(|FieldMetadata { name, is_vec, .. }| {
        let assignment = if is_vec {
            quote! { self.#name.push(*header) }
        } else {
            quote! { self.#name = Some(*header) }
        };

        quote! {
            fn add_header(&mut self, _: u32, header: &::mtklog::sans::header::SectorHeader) {
                #assignment;
            }
        }
    });

    let setting_method = setting.map(|FieldMetadata { name, is_vec, .. }| {
        let assignment = if is_vec {
            quote! { self.#name.push(*setting) }
        } else {
            quote! { self.#name = Some(*setting) }
        };

        quote! {
            fn add_setting(&mut self, setting: &::mtklog::sans::setting::Setting) {
                #assignment;
            }
        }
    });

    let point_method = point.map(|FieldMetadata { name, is_vec, .. }| {
        let assignment = if is_vec {
            quote! {
                self.#name.push(Default::default());
                self.#name.last_mut().map(|r| r as _)
            }
        } else {
            quote! {
                Some(self.#name.insert(Default::default()))
            }
        };

        quote! {
            fn add_point(&mut self, _: u32) -> Option<&mut dyn ::mtklog::avec::FromPoint> {
                #assignment
            }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl ::mtklog::avec::FromSector for #name {
            #header_method
            #setting_method
            #point_method
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
enum Role {
    Header,
    Setting,
    Point,
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    role: Role,
    is_vec: bool,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let name = field.ident.clone().unwrap();

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("sector")) else {
            return Ok(None);
        };

        let SectorAttribute { role } = attr.meta.require_list()?.parse_args()?;

        let Type::Path(path) = &field.ty else {
            Err(Error::new_spanned(
                &field.ty,
                "Field must have a type annotation.",
            ))?
        };

        let Some(segment) = path.path.segments.last() else {
            Err(Error::new_spanned(
                &path.path.segments,
                "Field must have an `Option<T>` or `Vec<T>` type.",
            ))?
        };

        let is_vec = if segment.ident == "Option" {
            false
        } else if segment.ident == "Vec" {
            true
        } else {
            Err(Error::new_spanned(
                &segment.ident,
                "Field must have an `Option<T>` or `Vec<T>` type.",
            ))?
        };

        Ok(Some(Self { name, role, is_vec }))
    }
}

#[derive(Debug)]
struct SectorAttribute {
    role: Role,
}

impl Parse for SectorAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let ident = input.parse::<Ident>()?;

        let role = if ident == "header" {
            Role::Header
        } else if ident == "setting" {
            Role::Setting
        } else if ident == "point" {
            Role::Point
        } else {
            Err(Error::new_spanned(
                ident,
                "Sector role must be `header`, `setting` or `point`.",
            ))?
        };

        Ok(Self { role })
    }
}
