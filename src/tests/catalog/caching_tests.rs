    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;
    use crate::catalog::FixtureCatalog;
    use crate::model::RootTypeId;

    struct Counting {
        inner: FixtureCatalog,
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl Counting {
        fn check(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("backend down");
            }
            Ok(())
        }
    }

    impl FitmentCatalog for Counting {
        fn root_types(&self) -> Result<Vec<RootType>> {
            self.check()?;
            self.inner.root_types()
        }

        fn fitment_values(
            &self,
            type_id: FitmentTypeId,
            context: &[SelectionPair],
        ) -> Result<Vec<FitmentValue>> {
            self.check()?;
            self.inner.fitment_values(type_id, context)
        }

        fn child_types(&self, query: &ChildTypesQuery) -> Result<Vec<FitmentType>> {
            self.check()?;
            self.inner.child_types(query)
        }
    }

    fn counting(fail: bool) -> Counting {
        Counting {
            inner: FixtureCatalog::from_json(include_str!("../../../fixtures/catalog.json"))
                .expect("parse fixture"),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(fail),
        }
    }

    #[test]
    fn repeated_lookups_hit_the_cache() -> Result<()> {
        let c = CachingCatalog::with_ttl(counting(false), Duration::from_secs(60));
        let a = c.fitment_values(FitmentTypeId(2), &[SelectionPair::new(1, 10)])?;
        let b = c.fitment_values(FitmentTypeId(2), &[SelectionPair::new(1, 10)])?;
        assert_eq!(a, b);
        c.root_types()?;
        c.root_types()?;
        let q = ChildTypesQuery::new(RootTypeId(1), Vec::new());
        c.child_types(&q)?;
        c.child_types(&q)?;
        assert_eq!(c.into_inner().calls.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[test]
    fn different_contexts_use_different_keys() -> Result<()> {
        let c = CachingCatalog::with_ttl(counting(false), Duration::from_secs(60));
        let y2020 = c.fitment_values(FitmentTypeId(2), &[SelectionPair::new(1, 10)])?;
        let y2021 = c.fitment_values(FitmentTypeId(2), &[SelectionPair::new(1, 11)])?;
        assert_ne!(y2020, y2021);
        Ok(())
    }

    #[test]
    fn failures_are_not_cached() {
        let c = CachingCatalog::with_ttl(counting(true), Duration::from_secs(60));
        assert!(c.root_types().is_err());
        c.inner.fail.store(false, Ordering::SeqCst);
        assert_eq!(c.root_types().map(|v| v.len()).ok(), Some(2));
    }

    #[test]
    fn invalidation_forces_a_refetch() -> Result<()> {
        let c = CachingCatalog::with_ttl(counting(false), Duration::from_secs(60));
        c.root_types()?;
        c.cache().invalidate(ROOT_TYPES_KEY);
        c.root_types()?;
        assert_eq!(c.inner.calls.load(Ordering::SeqCst), 2);
        Ok(())
    }
