use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Data,
    DeriveInput,
    Expr,
    Fields,
    Ident,
    Result,
    Token,
};

/// A single `name = expr` tag inside `#[error(...)]`.
enum Tag {
    Message(Expr),
    Labels(Expr),
    Help(Expr),
}

impl Parse for Tag {
    fn parse(input: ParseStream) -> Result<Self> {
        let name: Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        let value = input.parse()?;

        match name.to_string().as_str() {
            "message" => Ok(Self::Message(value)),
            "labels" => Ok(Self::Labels(value)),
            "help" => Ok(Self::Help(value)),
            other => Err(syn::Error::new_spanned(&name, format!("unknown tag `{}`", other))),
        }
    }
}

/// The contents of the `error` attribute. `message` is required, the rest is optional.
struct ErrorArgs {
    message: Expr,
    labels: Option<Expr>,
    help: Option<Expr>,
}

impl ErrorArgs {
    /// Collects the tags of the attribute, rejecting repeated tags.
    fn from_tags(name: &Ident, tags: Punctuated<Tag, Token![,]>) -> Result<Self> {
        fn set(slot: &mut Option<Expr>, value: Expr) -> Result<()> {
            if slot.is_some() {
                return Err(syn::Error::new_spanned(value, "tag given more than once"));
            }
            *slot = Some(value);
            Ok(())
        }

        let (mut message, mut labels, mut help) = (None, None, None);
        for tag in tags {
            match tag {
                Tag::Message(value) => set(&mut message, value)?,
                Tag::Labels(value) => set(&mut labels, value)?,
                Tag::Help(value) => set(&mut help, value)?,
            }
        }

        let message = message
            .ok_or_else(|| syn::Error::new(name.span(), "missing `message` tag in `error` attribute"))?;
        Ok(Self { message, labels, help })
    }
}

/// A struct deriving `ErrorKind`.
pub(crate) struct ErrorKindTarget {
    name: Ident,
    fields: Fields,
    args: ErrorArgs,
}

impl Parse for ErrorKindTarget {
    fn parse(input: ParseStream) -> Result<Self> {
        let input: DeriveInput = input.parse()?;
        let name = input.ident;

        let Data::Struct(data) = input.data else {
            return Err(syn::Error::new(name.span(), "`ErrorKind` can only be derived for structs"));
        };

        let attr = input.attrs
            .iter()
            .find(|attr| attr.path().is_ident("error"))
            .ok_or_else(|| syn::Error::new(name.span(), "missing `error` attribute"))?;
        let tags = attr.parse_args_with(Punctuated::<Tag, Token![,]>::parse_terminated)?;
        let args = ErrorArgs::from_tags(&name, tags)?;

        Ok(Self { name, fields: data.fields, args })
    }
}

impl ErrorKindTarget {
    /// Binds the named fields of `self` so the tag expressions can refer to them.
    fn bind_fields(&self) -> TokenStream2 {
        let name = &self.name;
        match &self.fields {
            Fields::Named(fields) => {
                let idents = fields.named.iter().filter_map(|field| field.ident.as_ref());
                quote! {
                    #[allow(unused_variables)]
                    let #name { #(#idents),* } = self;
                }
            },
            Fields::Unnamed(_) => quote_spanned! { name.span() =>
                compile_error!("`ErrorKind` cannot be derived for tuple structs");
            },
            Fields::Unit => TokenStream2::new(),
        }
    }

    /// Builds one ariadne label per span, pairing each span with the label text at the same
    /// position. Empty texts produce labels with no message.
    fn labels(&self) -> TokenStream2 {
        let texts = self.args.labels
            .as_ref()
            .map_or_else(|| quote! { [""] }, |labels| quote! { #labels });

        quote! {
            #texts
                .into_iter()
                .zip(spans)
                .map(|(text, span)| {
                    let text = text.to_string();
                    let label = ariadne::Label::new((src_id, span.clone()))
                        .with_color(arith_error::EXPR);
                    if text.is_empty() { label } else { label.with_message(text) }
                })
                .collect::<Vec<_>>()
        }
    }

    /// Expands to the full `ErrorKind` implementation.
    pub(crate) fn expand(&self) -> TokenStream2 {
        let name = &self.name;
        let bindings = self.bind_fields();
        let message = &self.args.message;
        let labels = self.labels();
        let help = self.args.help
            .as_ref()
            .map(|help| quote! { report.set_help(#help); });

        quote! {
            impl ErrorKind for #name {
                fn as_any(&self) -> &dyn std::any::Any {
                    self
                }

                fn build_report<'a>(
                    &self,
                    src_id: &'a str,
                    spans: &[std::ops::Range<usize>],
                ) -> ariadne::Report<(&'a str, std::ops::Range<usize>)> {
                    #bindings

                    let offset = spans.first().map_or(0, |span| span.start);
                    #[allow(unused_mut)]
                    let mut report = ariadne::Report::build(ariadne::ReportKind::Error, src_id, offset)
                        .with_message(#message)
                        .with_labels(#labels);
                    #help
                    report.finish()
                }
            }
        }
    }
}
