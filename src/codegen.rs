//! Render [`StringprepTables`] as Rust source: one `pub static` slice per
//! table, so that a consumer can embed the tables without parsing anything at
//! run time.
//!
//! Code points are written as hex literals.  Range tables become slices of
//! inclusive `(low, high)` pairs, mapping tables slices of
//! `(code, &[replacement...])` pairs in ascending key order.

use crate::tables::{StringprepTables, TableName, TableRef};
use crate::types::{CodePoint, CodePointRange};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, ToTokens};

/// A code point rendered as `0x0041` rather than `65`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct HexCodePoint(CodePoint);

impl ToTokens for HexCodePoint {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let literal = syn::LitInt::new(&format!("0x{:04X}", self.0), Span::call_site());
        literal.to_tokens(tokens);
    }
}

impl ToTokens for CodePointRange {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let low = HexCodePoint(self.low());
        let high = HexCodePoint(self.high());
        tokens.extend(quote! { (#low, #high) });
    }
}

fn hex(codes: &[CodePoint]) -> Vec<HexCodePoint> {
    codes.iter().copied().map(HexCodePoint).collect()
}

fn static_ident(name: &str) -> syn::Ident {
    format_ident!("{}", name.to_uppercase())
}

fn generate_table(name: TableName, table: TableRef<'_>) -> TokenStream {
    let ident = static_ident(name.as_str());
    match table {
        TableRef::Repertoires(repertoires) => repertoires
            .iter()
            .map(|repertoire| {
                let ident = static_ident(&format!(
                    "{}_{}",
                    name.as_str(),
                    repertoire.version.replace('.', "_")
                ));
                let ranges = &repertoire.unassigned;
                quote! {
                    pub static #ident: &[(u32, u32)] = &[#(#ranges),*];
                }
            })
            .collect(),
        TableRef::Points(points) => {
            let points = hex(points);
            quote! {
                pub static #ident: &[u32] = &[#(#points),*];
            }
        }
        TableRef::Ranges(ranges) => quote! {
            pub static #ident: &[(u32, u32)] = &[#(#ranges),*];
        },
        TableRef::Mapping(map) => {
            let entries = map.iter().map(|(&code, replacement)| {
                let code = HexCodePoint(code);
                let replacement = hex(replacement);
                quote! { (#code, &[#(#replacement),*]) }
            });
            quote! {
                pub static #ident: &[(u32, &[u32])] = &[#(#entries),*];
            }
        }
    }
}

/// Generate a module body declaring every table of `tables`, in
/// [`TableName::ALL`] order.
pub fn generate_tables_module(tables: &StringprepTables) -> TokenStream {
    TableName::ALL
        .iter()
        .map(|&name| generate_table(name, tables.table(name)))
        .collect()
}

#[cfg(test)]
fn static_items(tokens: TokenStream) -> Vec<(String, String)> {
    let file = syn::parse2::<syn::File>(tokens).expect("generated code parses");
    file.items
        .into_iter()
        .map(|item| match item {
            syn::Item::Static(item) => (
                item.ident.to_string(),
                item.ty.to_token_stream().to_string(),
            ),
            other => panic!("unexpected item {}", other.to_token_stream()),
        })
        .collect()
}

#[test]
fn generated_module_declares_every_table() {
    let tables = StringprepTables::new().expect("bundled tables");
    let items = static_items(generate_tables_module(&tables));

    let names = items.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>();
    assert_eq!(names.len(), TableName::ALL.len());
    assert_eq!(names[0], "UNASSIGNED_CODE_POINTS_3_2");
    assert_eq!(names[1], "MAP_TO_NOTHING");
    assert_eq!(names[4], "ASCII_SPACE");
    assert_eq!(names[16], "PROPERTY_L");

    let types = items
        .iter()
        .map(|(name, ty)| (name.as_str(), ty.replace(' ', "")))
        .collect::<std::collections::HashMap<_, _>>();
    assert_eq!(types["MAP_USED_WITH_NFKC"], "&[(u32,&[u32])]");
    assert_eq!(types["NON_ASCII_SPACE"], "&[u32]");
    assert_eq!(types["SURROGATE_CODES"], "&[(u32,u32)]");
}

#[test]
fn code_points_are_hex_literals() {
    let range = CodePointRange::new(0xD800, 0xDFFF).expect("valid range");
    assert_eq!(range.to_token_stream().to_string().replace(' ', ""), "(0xD800,0xDFFF)");

    let tables = StringprepTables::new().expect("bundled tables");
    let text = generate_table(TableName::MapUsedWithNfkc, tables.table(TableName::MapUsedWithNfkc))
        .to_string()
        .replace(' ', "");
    assert!(text.starts_with("pubstaticMAP_USED_WITH_NFKC"));
    assert!(text.contains("(0x00DF,&[0x0073,0x0073])"));
    assert!(text.contains("(0x037A,&[0x0020,0x03B9])"));
}
