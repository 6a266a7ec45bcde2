mod test_relay_rewrite;
