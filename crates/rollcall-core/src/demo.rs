//! Built-in demo dataset used when the client cannot reach the server.

use crate::model::{Class, Student};

pub fn classes() -> Vec<Class> {
  vec![
    Class {
      id:       1,
      name:     "Computer Science 101".into(),
      teacher:  "Prof. Smith".into(),
      schedule: None,
    },
    Class {
      id:       2,
      name:     "Mathematics 201".into(),
      teacher:  "Ms. Johnson".into(),
      schedule: None,
    },
  ]
}

pub fn students() -> Vec<Student> {
  vec![
    Student {
      id:       1,
      code:     "ST92731".into(),
      name:     "John Doe".into(),
      email:    None,
      class_id: Some(1),
    },
    Student {
      id:       2,
      code:     "ST84521".into(),
      name:     "Jane Smith".into(),
      email:    None,
      class_id: Some(1),
    },
  ]
}
