mod test_incremental;
