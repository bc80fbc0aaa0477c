fn main() { numlab_tasks::entry_points::fit_linear(); }
