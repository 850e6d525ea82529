pub fn sum(values: Vec<i64>) -> i64 {
    values.iter().sum()
}

pub fn is_empty(values: Vec<i64>) -> bool {
    values.is_empty()
}
