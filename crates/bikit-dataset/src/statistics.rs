//! Label statistics over a filtered manifest.

use bikit_core::{DefectClass, NUM_CLASSES};

use crate::manifest::Manifest;

/// Per-class positive counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetStatistics {
    pub num_samples: usize,
    /// Positive samples per class, in [`DefectClass::ALL`] order
    pub class_counts: [usize; NUM_CLASSES],
    /// Samples with more than one class present
    pub multi_label_samples: usize,
}

impl DatasetStatistics {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut stats = Self {
            num_samples: manifest.len(),
            ..Self::default()
        };

        for record in manifest.iter() {
            let mut present = 0;
            for (count, flag) in stats.class_counts.iter_mut().zip(record.labels) {
                if flag {
                    *count += 1;
                    present += 1;
                }
            }
            if present > 1 {
                stats.multi_label_samples += 1;
            }
        }

        stats
    }

    pub fn count(&self, class: DefectClass) -> usize {
        self.class_counts[class.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let csv = "\
img_name,img_path,split_type,Background,Crack,Spallation,Efflorescence,ExposedBars,CorrosionStain
a,a.png,train,1,0,0,0,0,0
b,b.png,train,0,1,1,0,0,0
c,c.png,test,0,1,0,0,0,1
";
        let manifest = Manifest::from_reader(csv.as_bytes()).unwrap();
        let stats = DatasetStatistics::from_manifest(&manifest);

        assert_eq!(stats.num_samples, 3);
        assert_eq!(stats.class_counts, [1, 2, 1, 0, 0, 1]);
        assert_eq!(stats.count(DefectClass::Crack), 2);
        assert_eq!(stats.multi_label_samples, 2);
    }

    #[test]
    fn test_empty() {
        let stats = DatasetStatistics::from_manifest(&Manifest::default());
        assert_eq!(stats, DatasetStatistics::default());
    }
}
