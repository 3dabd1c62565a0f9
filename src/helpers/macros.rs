//! Internal helper macros.

/// Implements [`From`] for a type by going through an intermediate type.
///
/// `forward_from!(A => B => C)` generates `impl From<A> for C`, converting `A` into `B` first.
/// This allows `?` to be used on results whose error type can only reach our
/// [`Error`](crate::Error) through another conversion.
///
/// # Examples
///
/// ```ignore
/// use pokedex_api::forward_from;
///
/// forward_from!(diesel_async::pooled_connection::PoolError => PoolError => Error);
/// ```
#[macro_export]
macro_rules! forward_from {
    ( $source_ty:ty => $intermediate_ty:ty => $target_ty:ty ) => {
        impl ::std::convert::From<$source_ty> for $target_ty {
            fn from(value: $source_ty) -> Self {
                ::std::convert::Into::<$intermediate_ty>::into(value).into()
            }
        }
    };
}
