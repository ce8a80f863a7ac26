use crate::attrs::FieldAttrs;
use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{
    ext::IdentExt, parse_quote, Data, DataStruct, DeriveInput, Error, Fields, Result, Visibility,
};

pub fn php_record(ast: &DeriveInput) -> Result<TokenStream> {
    let name = &ast.ident;
    let fields = match &ast.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(named),
            ..
        }) => &named.named,
        _ => {
            return Err(Error::new_spanned(
                name,
                "PhpRecord can only be derived for structs with named fields",
            ))
        }
    };

    let mut generics = ast.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::phpser::PhpValue));
        param.bounds.push(parse_quote!('static));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut descs = Vec::with_capacity(fields.len());
    let mut arms = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        let ident = match &field.ident {
            Some(ident) => ident,
            None => return Err(Error::new_spanned(field, "expected a named field")),
        };
        let attrs = FieldAttrs::parse(&field.attrs)?;

        let field_str = ident.unraw().to_string();
        let ty = &field.ty;
        let exported = matches!(field.vis, Visibility::Public(_));
        let embedded = attrs.embed;
        let tags = attrs.tags().into_iter().map(|(k, v)| quote! { (#k, #v) });

        descs.push(quote! {
            ::phpser::FieldDesc {
                name: #field_str,
                tags: &[#(#tags),*],
                exported: #exported,
                embedded: #embedded,
                shape: <#ty as ::phpser::PhpValue>::shape,
            }
        });

        let idx = Literal::usize_unsuffixed(index);
        arms.push(quote! {
            #idx => ::std::option::Option::Some(&self.#ident)
        });
    }

    let name_str = name.to_string();

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #[doc(hidden)]
            const __PHPSER_FIELDS: &'static [::phpser::FieldDesc] = &[#(#descs),*];
        }

        impl #impl_generics ::phpser::PhpValue for #name #ty_generics #where_clause {
            fn kind(&self) -> ::phpser::Kind<'_> {
                ::phpser::Kind::Record(self)
            }

            fn shape() -> ::phpser::Shape {
                ::phpser::Shape::record(::phpser::RecordShape::of::<Self>(
                    #name_str,
                    Self::__PHPSER_FIELDS,
                ))
            }
        }

        impl #impl_generics ::phpser::Record for #name #ty_generics #where_clause {
            fn record_shape(&self) -> ::phpser::RecordShape {
                ::phpser::RecordShape::of::<Self>(#name_str, Self::__PHPSER_FIELDS)
            }

            fn field(
                &self,
                index: usize,
            ) -> ::std::option::Option<&dyn ::phpser::PhpValue> {
                match index {
                    #(#arms,)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    })
}
