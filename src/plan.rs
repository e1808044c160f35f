//! Batch arithmetic and output naming

use std::path::Path;

/// How output files are suffixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchNaming {
    /// Zero-padded batch number: `data_01.csv` .. `data_10.csv`
    #[default]
    Sequential,
    /// Covered data-line range: `data_1-50.csv`, `data_51-100.csv`
    LineRange,
}

/// One contiguous run of data lines destined for a single output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    /// 1-based batch number
    pub number: usize,
    /// First data line covered (1-based, counted after the header)
    pub first_line: usize,
    /// Last data line covered, inclusive
    pub last_line: usize,
}

impl Batch {
    /// Number of data lines in this batch
    pub fn line_count(&self) -> usize {
        self.last_line + 1 - self.first_line
    }
}

/// The batches a file with `data_lines` data lines is cut into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    data_lines: usize,
    split_size: usize,
}

impl BatchPlan {
    /// Plan batches of `split_size` lines; `split_size` must be at least 1
    pub fn new(data_lines: usize, split_size: usize) -> Self {
        debug_assert!(split_size >= 1);
        Self { data_lines, split_size }
    }

    pub fn data_lines(&self) -> usize {
        self.data_lines
    }

    /// Total batch count, `ceil(data_lines / split_size)`
    pub fn batch_count(&self) -> usize {
        self.data_lines.div_ceil(self.split_size)
    }

    /// Digits needed to print the largest batch number
    pub fn number_width(&self) -> usize {
        digits(self.batch_count())
    }

    /// Batch `number` (1-based), if it exists
    pub fn batch(&self, number: usize) -> Option<Batch> {
        if number == 0 || number > self.batch_count() {
            return None;
        }

        let first_line = (number - 1) * self.split_size + 1;
        let last_line = if number == self.batch_count() {
            self.data_lines
        } else {
            first_line + self.split_size - 1
        };

        Some(Batch { number, first_line, last_line })
    }

    /// All batches in file order
    pub fn batches(&self) -> impl Iterator<Item = Batch> + '_ {
        (1..=self.batch_count()).filter_map(move |number| self.batch(number))
    }

    /// Suffix for `batch` under `naming`
    pub fn suffix(&self, batch: &Batch, naming: BatchNaming) -> String {
        match naming {
            BatchNaming::Sequential => {
                format!("{:0width$}", batch.number, width = self.number_width())
            }
            BatchNaming::LineRange => format!("{}-{}", batch.first_line, batch.last_line),
        }
    }

    /// Output file name for `batch` of `input`: `<stem>_<suffix><.ext>`
    pub fn file_name(&self, input: &Path, batch: &Batch, naming: BatchNaming) -> String {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = input
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        format!("{}_{}{}", stem, self.suffix(batch, naming), extension)
    }
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_count_is_ceiling() {
        assert_eq!(BatchPlan::new(0, 50).batch_count(), 0);
        assert_eq!(BatchPlan::new(1, 50).batch_count(), 1);
        assert_eq!(BatchPlan::new(50, 50).batch_count(), 1);
        assert_eq!(BatchPlan::new(51, 50).batch_count(), 2);
        assert_eq!(BatchPlan::new(103, 50).batch_count(), 3);
        assert_eq!(BatchPlan::new(7, 1).batch_count(), 7);
    }

    #[test]
    fn test_batches_cover_every_line_once() {
        for (lines, size) in [(103, 50), (100, 10), (9, 4), (1, 3)] {
            let plan = BatchPlan::new(lines, size);
            let mut next = 1;
            for batch in plan.batches() {
                assert_eq!(batch.first_line, next);
                assert!(batch.line_count() <= size);
                next = batch.last_line + 1;
            }
            assert_eq!(next, lines + 1);
        }
    }

    #[test]
    fn test_final_batch_is_short() {
        let plan = BatchPlan::new(103, 50);
        let lens: Vec<usize> = plan.batches().map(|b| b.line_count()).collect();
        assert_eq!(lens, vec![50, 50, 3]);
    }

    #[test]
    fn test_batch_out_of_range() {
        let plan = BatchPlan::new(10, 5);
        assert!(plan.batch(0).is_none());
        assert!(plan.batch(3).is_none());
    }

    #[test]
    fn test_sequential_suffix_padding() {
        let plan = BatchPlan::new(100, 10);
        let names: Vec<String> = plan
            .batches()
            .map(|b| plan.suffix(&b, BatchNaming::Sequential))
            .collect();
        assert_eq!(names.first().unwrap(), "01");
        assert_eq!(names.last().unwrap(), "10");
        assert!(names.iter().all(|n| n.len() == 2));

        let single = BatchPlan::new(3, 10);
        assert_eq!(single.suffix(&single.batch(1).unwrap(), BatchNaming::Sequential), "1");
    }

    #[test]
    fn test_line_range_suffix() {
        let plan = BatchPlan::new(103, 50);
        let names: Vec<String> = plan
            .batches()
            .map(|b| plan.suffix(&b, BatchNaming::LineRange))
            .collect();
        assert_eq!(names, vec!["1-50", "51-100", "101-103"]);
    }

    #[test]
    fn test_file_name_keeps_extension() {
        let plan = BatchPlan::new(20, 2);
        let batch = plan.batch(3).unwrap();

        assert_eq!(
            plan.file_name(Path::new("/data/export.v2.csv"), &batch, BatchNaming::Sequential),
            "export.v2_03.csv"
        );
        assert_eq!(
            plan.file_name(Path::new("README"), &batch, BatchNaming::LineRange),
            "README_5-6"
        );
    }

    #[test]
    fn test_digits() {
        assert_eq!(digits(0), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
        assert_eq!(digits(1000), 4);
    }
}
