#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;

use ring_queue::Queue;

// Every byte pair is one operation: the first selects it, the second is its argument.
fuzz_target!(|data: &[u8]| {
    let mut queue = Queue::new().unwrap();
    let mut model: VecDeque<String> = VecDeque::new();

    for op in data.chunks_exact(2) {
        let (code, arg) = (op[0] % 12, op[1]);
        let val = format!("{}", arg % 16);

        match code {
            0 => {
                queue.insert_head(&val).unwrap();
                model.push_front(val);
            }
            1 => {
                queue.insert_tail(&val).unwrap();
                model.push_back(val);
            }
            2 => {
                let mut buf = [0u8; 3];
                let removed = queue.remove_head(Some(&mut buf)).ok().map(|e| e.into_value());
                assert_eq!(removed, model.pop_front());
            }
            3 => {
                let removed = queue.remove_tail(None).ok().map(|e| e.into_value());
                assert_eq!(removed, model.pop_back());
            }
            4 => {
                let _ = queue.delete_mid();
                if !model.is_empty() {
                    model.remove(model.len() / 2);
                }
            }
            5 => {
                queue.sort(false);
                let _ = queue.delete_dup();
                let mut v: Vec<String> = model.drain(..).collect();
                v.sort();
                for (i, val) in v.iter().enumerate() {
                    let dup = (i > 0 && v[i - 1] == *val) || (i + 1 < v.len() && v[i + 1] == *val);
                    if !dup {
                        model.push_back(val.clone());
                    }
                }
            }
            6 => {
                queue.swap();
                for pair in model.make_contiguous().chunks_mut(2) {
                    pair.reverse();
                }
            }
            7 => {
                queue.reverse();
                model.make_contiguous().reverse();
            }
            8 => {
                let k = (arg % 6) as usize;
                queue.reverse_k(k).unwrap();
                if k > 1 {
                    for group in model.make_contiguous().chunks_exact_mut(k) {
                        group.reverse();
                    }
                }
            }
            9 => {
                let descend = arg & 1 == 1;
                queue.sort(descend);
                let v = model.make_contiguous();
                v.sort();
                if descend {
                    v.reverse();
                }
            }
            10 => {
                let remaining = queue.ascend();
                let v: Vec<String> = model.drain(..).collect();
                for (i, val) in v.iter().enumerate() {
                    if !v[i + 1..].iter().any(|later| later < val) {
                        model.push_back(val.clone());
                    }
                }
                assert_eq!(remaining, model.len());
            }
            _ => {
                let remaining = queue.descend();
                let v: Vec<String> = model.drain(..).collect();
                for (i, val) in v.iter().enumerate() {
                    if !v[i + 1..].iter().any(|later| later > val) {
                        model.push_back(val.clone());
                    }
                }
                assert_eq!(remaining, model.len());
            }
        }

        assert_eq!(queue.validate(), Ok(model.len()));
        assert!(queue.iter().eq(model.iter().map(String::as_str)));
    }
});
