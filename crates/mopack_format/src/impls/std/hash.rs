use crate::impls::{impl_codec_for_hashmap, impl_codec_for_hashset};

impl_codec_for_hashset!(::std::collections::HashSet<T, S>);
impl_codec_for_hashmap!(::std::collections::HashMap<K, V, S>);
