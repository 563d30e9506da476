use crate::internal::Sealed;

macro_rules! markers {
  { $( $(#[$meta:meta])* $ident:ident, )* } => {$(
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $ident;
    impl Sealed for $ident {}
    impl Marker for $ident {}
  )*};
}

markers! {
  AnyMarker,
  CommentMarker,
  /// Marker for [karma transactions](crate::schema::KarmaTransaction).
  KarmaMarker,
  LikeMarker,
  PostMarker,
  UserMarker,
}

/// This trait represents a marker restricting all objects to
/// from using it as a generic in [Id] object.
///
/// [Id]: super::Id
pub trait Marker: Sealed {}
