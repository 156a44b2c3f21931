use burn::{prelude::*, tensor::BasicOps};

use crate::env::Observation;

/// A trait for converting items to tensors
///
/// Implemented for [`Observation`] (shape `[3, rows, cols]`) and for batches of
/// observations (shape `[n, 3, rows, cols]`) so a burn model can consume them directly.
pub trait ToTensor<B: Backend, const D: usize, K: BasicOps<B>> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, D, K>;
}

impl<B: Backend> ToTensor<B, 3, Float> for &Observation {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 3> {
        let data = Data::new(self.to_vec(), Shape::new(self.shape()));
        Tensor::from_data(data.convert::<B::FloatElem>(), device)
    }
}

impl<B: Backend> ToTensor<B, 4, Float> for Vec<Observation> {
    /// **Panics** if the batch is empty or the observations differ in shape
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 4> {
        assert!(!self.is_empty(), "Cannot build a tensor from an empty batch");
        let [layers, rows, cols] = self[0].shape();
        assert!(
            self.iter().all(|o| o.shape() == [layers, rows, cols]),
            "All observations in a batch must share one shape"
        );

        let len = self.len();
        let values = self.iter().flat_map(Observation::to_vec).collect();
        let data = Data::new(values, Shape::new([len, layers, rows, cols]));
        Tensor::from_data(data.convert::<B::FloatElem>(), device)
    }
}
