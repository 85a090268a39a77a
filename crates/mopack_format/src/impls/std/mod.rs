mod hash;
mod time;
