/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

//!
//! A minimal list interface with checked indexing.
//!
use sqlbean_core::DataError;

pub trait MyList<E> {
    fn add(&mut self, e: E);

    fn get(&self, index: usize) -> Result<&E, DataError>;

    fn remove(&mut self, index: usize) -> Result<E, DataError>;

    /// Inserts before `index`; `index == size()` appends.
    fn insert(&mut self, index: usize, e: E) -> Result<(), DataError>;

    fn contains(&self, e: &E) -> bool
    where
        E: PartialEq;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn clear_list(&mut self);
}

/// `Vec` backed `MyList`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayList<E> {
    elements: Vec<E>,
}

impl<E> ArrayList<E> {
    pub fn new() -> Self {
        ArrayList { elements: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ArrayList { elements: Vec::with_capacity(capacity) }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.elements.iter()
    }

    pub fn into_vec(self) -> Vec<E> {
        self.elements
    }

    fn check_index(&self, index: usize) -> Result<(), DataError> {
        if index >= self.elements.len() {
            return Err(DataError::IndexOutOfBounds(index, self.elements.len()));
        }
        Ok(())
    }
}

impl<E> Default for ArrayList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> From<Vec<E>> for ArrayList<E> {
    fn from(elements: Vec<E>) -> Self {
        ArrayList { elements }
    }
}

impl<E> FromIterator<E> for ArrayList<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        ArrayList { elements: iter.into_iter().collect() }
    }
}

impl<E> MyList<E> for ArrayList<E> {
    fn add(&mut self, e: E) {
        self.elements.push(e);
    }

    fn get(&self, index: usize) -> Result<&E, DataError> {
        self.check_index(index)?;
        Ok(&self.elements[index])
    }

    fn remove(&mut self, index: usize) -> Result<E, DataError> {
        self.check_index(index)?;
        Ok(self.elements.remove(index))
    }

    fn insert(&mut self, index: usize, e: E) -> Result<(), DataError> {
        if index > self.elements.len() {
            return Err(DataError::IndexOutOfBounds(index, self.elements.len()));
        }
        self.elements.insert(index, e);
        Ok(())
    }

    fn contains(&self, e: &E) -> bool
    where
        E: PartialEq,
    {
        self.elements.contains(e)
    }

    fn size(&self) -> usize {
        self.elements.len()
    }

    fn clear_list(&mut self) {
        self.elements.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_list() {
        let mut list = ArrayList::new();
        assert!(list.is_empty());
        list.add("a");
        list.add("c");
        list.insert(1, "b").unwrap();
        assert_eq!(list.size(), 3);
        assert_eq!(*list.get(1).unwrap(), "b");
        assert!(list.contains(&"c"));
        assert_eq!(list.remove(0).unwrap(), "a");
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["b", "c"]);
        list.clear_list();
        assert!(list.is_empty());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut list: ArrayList<i32> = vec![1, 2].into();
        assert_eq!(list.get(2), Err(DataError::IndexOutOfBounds(2, 2)));
        assert_eq!(list.remove(5), Err(DataError::IndexOutOfBounds(5, 2)));
        assert_eq!(list.insert(3, 9), Err(DataError::IndexOutOfBounds(3, 2)));
        list.insert(2, 3).unwrap();
        assert_eq!(list.into_vec(), vec![1, 2, 3]);
        assert_eq!(
            DataError::IndexOutOfBounds(4, 1).to_string(),
            "IndexOutOfBoundsException: Index: 4, Size: 1"
        );
    }
}
