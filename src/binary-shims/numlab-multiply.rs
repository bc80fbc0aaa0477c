fn main() { numlab_tasks::entry_points::multiply(); }
