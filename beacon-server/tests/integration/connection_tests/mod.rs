mod test_solo_join;
