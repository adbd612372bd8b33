pub mod test_next;
