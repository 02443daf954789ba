use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod from_point;
mod from_sector;

#[proc_macro_derive(FromPoint, attributes(field))]
pub fn derive_from_point(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match from_point::expand_from_point(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}

#[proc_macro_derive(FromSector, attributes(sector))]
pub fn derive_from_sector(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match from_sector::expand_from_sector(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
