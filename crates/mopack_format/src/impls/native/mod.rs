// u8 - u64, i8 - i64, usize, isize, f32, f64, bool, char, ()
mod native_basic;

// String
mod native_str;

// (T1,)  (T1, T2)  ...  (T1, T2, .. T8)
mod native_tuple;

// [T; N]
mod native_array;
