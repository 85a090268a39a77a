mod bytes;
mod timestamp;
