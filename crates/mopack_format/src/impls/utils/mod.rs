mod scalar_type;
pub(crate) use scalar_type::impl_scalar_described;

mod hash_map;
pub(crate) use hash_map::impl_codec_for_hashmap;

mod hash_set;
pub(crate) use hash_set::impl_codec_for_hashset;
