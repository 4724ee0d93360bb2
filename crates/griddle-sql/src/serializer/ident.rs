use super::{Formatter, Params, ToSql};

pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let quoted = f.serializer.capability.quote_identifier(self.0.as_ref());
        f.dst.push_str(&quoted);
    }
}
