use syn::{meta::ParseNestedMeta, token, Attribute, Expr, LitStr, Result, Token};

const PHP: &str = "php";
const SERDE: &str = "serde";

/// Options collected from one attribute namespace.
#[derive(Default)]
struct TagSpec {
    present: bool,
    rename: Option<String>,
    skip: bool,
    omit_empty: bool,
    as_text: bool,
}

impl TagSpec {
    /// Renders the options the way the runtime tag parser reads them:
    /// `name[,omitempty][,string]`, or `-` for a skipped field.
    fn render(&self) -> Option<String> {
        if !self.present {
            return None;
        }
        if self.skip {
            return Some("-".into());
        }
        let mut out = self.rename.clone().unwrap_or_default();
        if self.omit_empty {
            out.push_str(",omitempty");
        }
        if self.as_text {
            out.push_str(",string");
        }
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

#[derive(Default)]
pub(crate) struct FieldAttrs {
    php: TagSpec,
    serde: TagSpec,
    pub(crate) embed: bool,
}

impl FieldAttrs {
    pub(crate) fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut out = FieldAttrs::default();
        for attr in attrs {
            if attr.path().is_ident(PHP) {
                out.php.present = true;
                out.parse_php(attr)?;
            } else if attr.path().is_ident(SERDE) {
                out.serde.present = true;
                out.parse_serde(attr)?;
            }
        }
        Ok(out)
    }

    /// `(key, value)` tag pairs, in the order they are consulted.
    pub(crate) fn tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = Vec::with_capacity(2);
        if let Some(t) = self.php.render() {
            tags.push((PHP, t));
        }
        if let Some(t) = self.serde.render() {
            tags.push((SERDE, t));
        }
        tags
    }

    fn parse_php(&mut self, attr: &Attribute) -> Result<()> {
        let spec = &mut self.php;
        let embed = &mut self.embed;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let name: LitStr = meta.value()?.parse()?;
                spec.rename = Some(name.value());
            } else if meta.path.is_ident("omitempty") {
                spec.omit_empty = true;
            } else if meta.path.is_ident("string") {
                spec.as_text = true;
            } else if meta.path.is_ident("skip") {
                spec.skip = true;
            } else if meta.path.is_ident("embed") {
                *embed = true;
            } else {
                return Err(meta.error("unknown php attribute"));
            }
            Ok(())
        })
    }

    fn parse_serde(&mut self, attr: &Attribute) -> Result<()> {
        let spec = &mut self.serde;
        let embed = &mut self.embed;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if meta.input.peek(Token![=]) {
                    let name: LitStr = meta.value()?.parse()?;
                    spec.rename = Some(name.value());
                } else {
                    // rename(serialize = "..", deserialize = "..")
                    meta.parse_nested_meta(|inner| {
                        if inner.path.is_ident("serialize") {
                            let name: LitStr = inner.value()?.parse()?;
                            spec.rename = Some(name.value());
                            Ok(())
                        } else {
                            skip_meta(&inner)
                        }
                    })?;
                }
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                spec.skip = true;
            } else if meta.path.is_ident("skip_serializing_if") {
                let _: LitStr = meta.value()?.parse()?;
                spec.omit_empty = true;
            } else if meta.path.is_ident("flatten") {
                *embed = true;
            } else {
                skip_meta(&meta)?;
            }
            Ok(())
        })
    }
}

/// Consumes the value of a serde option we don't care about.
fn skip_meta(meta: &ParseNestedMeta) -> Result<()> {
    if meta.input.peek(Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn tags_of(attrs: Vec<Attribute>) -> Vec<(&'static str, String)> {
        FieldAttrs::parse(&attrs).unwrap().tags()
    }

    #[test]
    fn php_options() {
        let tags = tags_of(vec![parse_quote!(#[php(rename = "a", omitempty, string)])]);
        assert_eq!(tags, vec![("php", "a,omitempty,string".to_string())]);

        let tags = tags_of(vec![parse_quote!(#[php(omitempty)])]);
        assert_eq!(tags, vec![("php", ",omitempty".to_string())]);

        let tags = tags_of(vec![parse_quote!(#[php(skip)])]);
        assert_eq!(tags, vec![("php", "-".to_string())]);
    }

    #[test]
    fn embed_alone_is_untagged() {
        let attrs = FieldAttrs::parse(&[parse_quote!(#[php(embed)])]).unwrap();
        assert!(attrs.embed);
        assert!(attrs.tags().is_empty());
    }

    #[test]
    fn serde_options() {
        let tags = tags_of(vec![
            parse_quote!(#[serde(default, rename = "b")]),
            parse_quote!(#[serde(skip_serializing_if = "Option::is_none", with = "m")]),
        ]);
        assert_eq!(tags, vec![("serde", "b,omitempty".to_string())]);

        let tags = tags_of(vec![parse_quote!(#[serde(rename(serialize = "s", deserialize = "d"))])]);
        assert_eq!(tags, vec![("serde", "s".to_string())]);

        let attrs = FieldAttrs::parse(&[parse_quote!(#[serde(flatten)])]).unwrap();
        assert!(attrs.embed);
    }

    #[test]
    fn both_namespaces_are_kept() {
        let tags = tags_of(vec![
            parse_quote!(#[serde(rename = "s")]),
            parse_quote!(#[php(rename = "p")]),
        ]);
        assert_eq!(
            tags,
            vec![("php", "p".to_string()), ("serde", "s".to_string())]
        );
    }

    #[test]
    fn unknown_php_option_is_an_error() {
        assert!(FieldAttrs::parse(&[parse_quote!(#[php(sometimes)])]).is_err());
    }
}
