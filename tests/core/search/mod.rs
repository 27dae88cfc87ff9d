mod test_postprocess;
mod test_ranking;
