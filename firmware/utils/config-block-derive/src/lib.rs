//! # Config Block Derive
//!
//! This crate provides `#[derive(ConfigBlock)]`, which turns a plain struct of
//! fixed-size fields into a GUID-tagged configuration block payload.
//!
//! The derive generates:
//! * the `config_block::ConfigBlock` impl: `GUID`, `REVISION`, `PAYLOAD_SIZE`
//!   and a packed little-endian `encode`/`decode` pair walking the fields in
//!   declaration order,
//! * `.set_<field>(&mut self, value) -> &mut Self` for updater mutators,
//! * `const .with_<field>(self, value) -> Self` for compiled-in default tables.
//!
//! Every field type must implement `config_block::BlockField`.
//!
//! # Attributes
//! * `#[config_block(guid = "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx", revision = N)]`
//!   on the struct (both required).
//! * `#[config_block(reserved)]` on a field: encoded like any other field, but
//!   no accessors are generated for it.
//!
//! # Example
//!
//! ```ignore
//! use config_block::ConfigBlock;
//!
//! #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ConfigBlock)]
//! #[config_block(guid = "0b3ca4e4-7d3a-4b4e-9f0a-5b1d2c3e4f50", revision = 1)]
//! struct ThermalConfig {
//!     tcc_offset: u8,
//!     #[config_block(reserved)]
//!     _reserved: [u8; 3],
//!     critical_trip_point: u32,
//! }
//!
//! let mut c = ThermalConfig::default().with_tcc_offset(10);
//! c.set_critical_trip_point(100);
//! assert_eq!(ThermalConfig::PAYLOAD_SIZE, 8);
//! ```

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, LitInt, LitStr, parse_macro_input, spanned::Spanned};

#[proc_macro_derive(ConfigBlock, attributes(config_block))]
pub fn derive_config_block(input: TokenStream) -> TokenStream {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = parse_macro_input!(input as DeriveInput);

    let fields = match data {
        Data::Struct(s) => match s.fields {
            Fields::Named(n) => n.named,
            Fields::Unnamed(u) => {
                return syn::Error::new(u.span(), "ConfigBlock only supports named fields")
                    .to_compile_error()
                    .into();
            }
            Fields::Unit => {
                return syn::Error::new(ident.span(), "ConfigBlock does not apply to unit structs")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new(ident.span(), "ConfigBlock can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let (guid, revision) = match block_attributes(&ident, &attrs) {
        Ok(v) => v,
        Err(e) => return e.to_compile_error().into(),
    };

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut names = Vec::new();
    let mut locals = Vec::new();
    let mut types = Vec::new();
    let mut accessors = Vec::new();

    // Locals are named by position so no field name can shadow them.
    for (index, field) in fields.iter().enumerate() {
        let Some(fname) = &field.ident else { continue };
        let ty = &field.ty;
        names.push(fname);
        locals.push(format_ident!("__cb_field{}", index));
        types.push(ty);

        match is_reserved(&field.attrs) {
            Ok(true) => continue,
            Ok(false) => {}
            Err(e) => return e.to_compile_error().into(),
        }

        let set_name = format_ident!("set_{}", fname);
        let with_name = format_ident!("with_{}", fname);

        accessors.push(quote! {
            #[inline]
            pub fn #set_name(&mut self, value: #ty) -> &mut Self {
                self.#fname = value;
                self
            }

            #[inline]
            #[must_use]
            pub const fn #with_name(mut self, value: #ty) -> Self {
                self.#fname = value;
                self
            }
        });
    }

    let expanded = quote! {
        #[automatically_derived]
        impl #impl_generics ::config_block::ConfigBlock for #ident #ty_generics #where_clause {
            const GUID: ::config_block::Guid = ::config_block::guid!(#guid);
            const REVISION: u8 = #revision;
            const PAYLOAD_SIZE: usize =
                0 #(+ <#types as ::config_block::BlockField>::SIZE)*;

            fn encode(&self, out: &mut [u8]) {
                let mut __cb_cursor = 0usize;
                #(
                    let __cb_end = __cb_cursor + <#types as ::config_block::BlockField>::SIZE;
                    ::config_block::BlockField::write_le(&self.#names, &mut out[__cb_cursor..__cb_end]);
                    __cb_cursor = __cb_end;
                )*
                let _ = __cb_cursor;
            }

            fn decode(bytes: &[u8]) -> Self {
                let mut __cb_cursor = 0usize;
                #(
                    let __cb_end = __cb_cursor + <#types as ::config_block::BlockField>::SIZE;
                    let #locals = <#types as ::config_block::BlockField>::read_le(&bytes[__cb_cursor..__cb_end]);
                    __cb_cursor = __cb_end;
                )*
                let _ = __cb_cursor;
                Self { #(#names: #locals),* }
            }
        }

        impl #impl_generics #ident #ty_generics #where_clause {
            #(#accessors)*
        }
    };

    TokenStream::from(expanded)
}

/// Parses `#[config_block(guid = "...", revision = N)]` on the struct.
fn block_attributes(ident: &syn::Ident, attrs: &[Attribute]) -> syn::Result<(LitStr, LitInt)> {
    let mut guid = None;
    let mut revision = None;

    for attr in attrs {
        if !attr.path().is_ident("config_block") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("guid") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().len() != 36 {
                    return Err(meta.error("expected a GUID in registry format (36 characters)"));
                }
                guid = Some(lit);
                Ok(())
            } else if meta.path.is_ident("revision") {
                let lit: LitInt = meta.value()?.parse()?;
                lit.base10_parse::<u8>()?;
                revision = Some(lit);
                Ok(())
            } else {
                Err(meta.error("unsupported config_block attribute"))
            }
        })?;
    }

    let Some(guid) = guid else {
        return Err(syn::Error::new(
            ident.span(),
            "missing #[config_block(guid = \"...\")]",
        ));
    };
    let Some(revision) = revision else {
        return Err(syn::Error::new(
            ident.span(),
            "missing #[config_block(revision = N)]",
        ));
    };

    Ok((guid, revision))
}

/// Accepts `#[config_block(reserved)]` on a field.
fn is_reserved(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut reserved = false;
    for attr in attrs {
        if !attr.path().is_ident("config_block") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("reserved") {
                reserved = true;
                Ok(())
            } else {
                Err(meta.error("unsupported field attribute; expected `reserved`"))
            }
        })?;
    }
    Ok(reserved)
}
