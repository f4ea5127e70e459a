/// Copies settable fields from `Source` onto `self` in place.
///
/// Implementations enumerate the editable fields explicitly and must leave
/// identity and relationship fields untouched.
pub trait ApplyFields<Source: ?Sized> {
    fn apply_fields(&mut self, source: &Source);
}
